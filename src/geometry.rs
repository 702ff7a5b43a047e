//! Tessellation of solids and segments into point lists.
//!
//! Solids are emitted as consecutive point triples, each one triangle wound so
//! that `(p1 - p0) x (p2 - p0)` points out of the surface. Segments are emitted
//! as point pairs. Nothing here knows about the frame stack: points come out in
//! the local coordinates they were described in.
use std::f64::consts::PI;

use nalgebra::Point3;

use crate::error::{RenderError, Result};
use crate::matrix::PointMatrix;

/// Triangles [`add_sphere`] emits for a given tessellation step,
/// `None` if the count does not fit in a `usize`.
pub fn sphere_triangle_count(step: usize) -> Option<usize> {
    return step.checked_mul(step.saturating_sub(1))?.checked_mul(4);
}

/// Triangles [`add_torus`] emits for a given tessellation step,
/// `None` if the count does not fit in a `usize`.
pub fn torus_triangle_count(step: usize) -> Option<usize> {
    return step.checked_mul(step)?.checked_mul(8);
}

/// Reserves room for `triangles` before any of their points are computed.
fn reserve_triangles(m: &mut PointMatrix, triangles: Option<usize>) -> Result<()> {
    let columns = triangles
        .and_then(|count| count.checked_mul(3))
        .ok_or(RenderError::BufferCapacityExceeded {
            requested: usize::MAX,
            limit: m.limit(),
        })?;
    return m.reserve(columns);
}

fn add_triangle(m: &mut PointMatrix, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Result<()> {
    m.push_point(a)?;
    m.push_point(b)?;
    m.push_point(c)?;
    return Ok(());
}

/// Axis-aligned box spanned by two opposite corners, as 12 triangles.
pub fn add_box(m: &mut PointMatrix, corner_0: Point3<f64>, corner_1: Point3<f64>) -> Result<()> {
    let (x0, x1) = (corner_0.x.min(corner_1.x), corner_0.x.max(corner_1.x));
    let (y0, y1) = (corner_0.y.min(corner_1.y), corner_0.y.max(corner_1.y));
    let (z0, z1) = (corner_0.z.min(corner_1.z), corner_0.z.max(corner_1.z));
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);

    m.reserve(36)?;
    // Front (+z) and back (-z).
    add_triangle(m, p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1))?;
    add_triangle(m, p(x0, y0, z1), p(x1, y1, z1), p(x0, y1, z1))?;
    add_triangle(m, p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0))?;
    add_triangle(m, p(x0, y0, z0), p(x1, y1, z0), p(x1, y0, z0))?;
    // Top (+y) and bottom (-y).
    add_triangle(m, p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1))?;
    add_triangle(m, p(x0, y1, z0), p(x1, y1, z1), p(x1, y1, z0))?;
    add_triangle(m, p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1))?;
    add_triangle(m, p(x0, y0, z0), p(x1, y0, z1), p(x0, y0, z1))?;
    // Right (+x) and left (-x).
    add_triangle(m, p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1))?;
    add_triangle(m, p(x1, y0, z0), p(x1, y1, z1), p(x1, y0, z1))?;
    add_triangle(m, p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1))?;
    add_triangle(m, p(x0, y0, z0), p(x0, y1, z1), p(x0, y1, z0))?;
    return Ok(());
}

/// Points of a sphere, grouped by longitude slice.
///
/// A half circle in the xy plane is split into `step` segments (so `step + 1`
/// points, both poles included) and swept around the x axis in `2 * step`
/// slices.
fn sphere_points(center: Point3<f64>, radius: f64, step: usize) -> Vec<Vec<Point3<f64>>> {
    let slices = 2 * step;
    let mut grid = Vec::with_capacity(slices);
    for slice in 0..slices {
        let theta = PI * slice as f64 / step as f64;
        let mut meridian = Vec::with_capacity(step + 1);
        for ring in 0..=step {
            let phi = PI * ring as f64 / step as f64;
            meridian.push(Point3::new(
                center.x + radius * phi.cos(),
                center.y + radius * phi.sin() * theta.cos(),
                center.z + radius * phi.sin() * theta.sin(),
            ));
        }
        grid.push(meridian);
    }
    return grid;
}

/// Sphere as a latitude/longitude triangle mesh.
///
/// Triangles touching a pole would collapse to a line and are left out, which
/// gives [`sphere_triangle_count`] triangles.
pub fn add_sphere(
    m: &mut PointMatrix,
    center: Point3<f64>,
    radius: f64,
    step: usize,
) -> Result<()> {
    if step == 0 {
        return Ok(());
    }
    reserve_triangles(m, sphere_triangle_count(step))?;
    let grid = sphere_points(center, radius, step);
    let slices = grid.len();
    for slice in 0..slices {
        let here = &grid[slice];
        let next = &grid[(slice + 1) % slices];
        for ring in 0..step {
            // Band between latitude `ring` and `ring + 1`.
            if ring != step - 1 {
                add_triangle(m, here[ring], here[ring + 1], next[ring + 1])?;
            }
            if ring != 0 {
                add_triangle(m, here[ring], next[ring + 1], next[ring])?;
            }
        }
    }
    return Ok(());
}

/// Points of a torus, grouped by ring angle.
///
/// The tube circle lies in the xy plane around (`outer_radius`, 0, 0) and is
/// swept around the y axis. Both angles are split into `2 * step` steps.
fn torus_points(
    center: Point3<f64>,
    inner_radius: f64,
    outer_radius: f64,
    step: usize,
) -> Vec<Vec<Point3<f64>>> {
    let steps = 2 * step;
    let mut grid = Vec::with_capacity(steps);
    for ring in 0..steps {
        let theta = PI * ring as f64 / step as f64;
        let mut tube = Vec::with_capacity(steps);
        for around in 0..steps {
            let phi = PI * around as f64 / step as f64;
            let distance = outer_radius + inner_radius * phi.cos();
            tube.push(Point3::new(
                center.x + distance * theta.cos(),
                center.y + inner_radius * phi.sin(),
                center.z - distance * theta.sin(),
            ));
        }
        grid.push(tube);
    }
    return grid;
}

/// Torus as a triangle mesh wrapping around in both angles.
///
/// `inner_radius` is the radius of the tube cross-section, `outer_radius` the
/// distance from `center` to the middle of the tube.
pub fn add_torus(
    m: &mut PointMatrix,
    center: Point3<f64>,
    inner_radius: f64,
    outer_radius: f64,
    step: usize,
) -> Result<()> {
    if step == 0 {
        return Ok(());
    }
    reserve_triangles(m, torus_triangle_count(step))?;
    let grid = torus_points(center, inner_radius, outer_radius, step);
    let steps = grid.len();
    for ring in 0..steps {
        let here = &grid[ring];
        let next = &grid[(ring + 1) % steps];
        for around in 0..steps {
            let up = (around + 1) % steps;
            add_triangle(m, here[around], next[around], next[up])?;
            add_triangle(m, here[around], next[up], here[up])?;
        }
    }
    return Ok(());
}

/// Line segment from `p0` to `p1`.
pub fn add_edge(m: &mut PointMatrix, p0: Point3<f64>, p1: Point3<f64>) -> Result<()> {
    m.push_point(p0)?;
    m.push_point(p1)?;
    return Ok(());
}
