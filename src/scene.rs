mod shader;
mod util;

use std::ops::AddAssign;

use log::{trace, warn};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::config::Lighting;
use crate::matrix::PointMatrix;
use util::{edge_at_row, face_normal, projected_area};

pub use shader::{ambient_term, shade};

/// Slack when deciding whether a pixel center lies on a triangle's edge.
const EDGE_EPSILON: f64 = 1e-9;

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        return Color { r, g, b };
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        return [color.r, color.g, color.b];
    }
}

/// Rendered image, holding its width, height and a private flat array of rgb8 data.
/// (0, 0) is the bottom left pixel, while the data itself is stored top row first
/// so it can be handed to image writers and windows as is.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    render_data: Vec<u8>,
}

impl PixelBuffer {
    /// New buffer of the given size, filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let n_pixels = (width as usize) * (height as usize);
        let mut render_data = Vec::with_capacity(3 * n_pixels);
        for _ in 0..n_pixels {
            render_data.extend_from_slice(&[background.r, background.g, background.b]);
        }
        return Self {
            width,
            height,
            render_data,
        };
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    /// Get rendered scene as a slice of color values of size 3 * (number of pixels).
    pub fn as_render_data(&self) -> &[u8] {
        return &self.render_data[..];
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        return x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height;
    }

    fn index(&self, x: i32, y: i32) -> usize {
        // Flipping y so that (0, 0) lands in the bottom left.
        let row = (self.height as usize - 1) - y as usize;
        return 3 * (x as usize + row * self.width as usize);
    }

    /// Sets the pixel at (x, y). Coordinates outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let index = self.index(x, y);
        self.render_data[index..index + 3].copy_from_slice(&[color.r, color.g, color.b]);
    }

    /// Color at (x, y), `None` outside the buffer.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let index = self.index(x, y);
        let data = &self.render_data[index..index + 3];
        return Some(Color {
            r: data[0],
            g: data[1],
            b: data[2],
        });
    }
}

/// Per-pixel depth of the nearest surface drawn so far.
/// Larger z is closer to the viewer; untouched pixels hold negative infinity.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    z_buffer: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let n_pixels = (width as usize) * (height as usize);
        return Self {
            width,
            height,
            z_buffer: vec![f64::NEG_INFINITY; n_pixels],
        };
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        return Some(x as usize + y as usize * self.width as usize);
    }

    /// Stored depth at (x, y), negative infinity outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> f64 {
        return match self.index(x, y) {
            Some(index) => self.z_buffer[index],
            None => f64::NEG_INFINITY,
        };
    }

    /// Records `z` at (x, y) if it is strictly nearer than what is stored.
    /// Returns whether the pixel should be redrawn.
    pub fn test_and_set(&mut self, x: i32, y: i32, z: f64) -> bool {
        let Some(index) = self.index(x, y) else {
            return false;
        };
        if z <= self.z_buffer[index] {
            return false;
        }
        self.z_buffer[index] = z;
        return true;
    }
}

/// What a draw call did with the primitives it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    /// Primitives rasterized.
    pub drawn: usize,
    /// Triangles facing away from the viewer.
    pub culled: usize,
    /// Triangles without area, skipped.
    pub degenerate: usize,
    /// Trailing columns that did not form a whole primitive.
    pub ignored_columns: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.drawn += other.drawn;
        self.culled += other.culled;
        self.degenerate += other.degenerate;
        self.ignored_columns += other.ignored_columns;
    }
}

/// Columns left over after splitting `points` into groups of `group`.
fn leftover_columns(points: &PointMatrix, group: usize, what: &str) -> usize {
    let remainder = points.len() % group;
    if remainder != 0 {
        warn!(
            "malformed geometry: {} columns is not a multiple of {} for {}, ignoring the last {}",
            points.len(),
            group,
            what,
            remainder
        );
    }
    return remainder;
}

/// Draws every consecutive column triple of `points` as a flat shaded triangle.
///
/// Triangles facing away from `lighting.view` are culled, triangles without
/// area are skipped. Pixels are only written where the triangle is nearer than
/// the depth buffer.
pub fn draw_polygons(
    points: &PointMatrix,
    pixels: &mut PixelBuffer,
    depth: &mut DepthBuffer,
    lighting: &Lighting,
) -> DrawStats {
    let mut stats = DrawStats {
        ignored_columns: leftover_columns(points, 3, "polygons"),
        ..Default::default()
    };
    let view = lighting.view;

    for i in 0..points.len() / 3 {
        let a = points.point(3 * i);
        let b = points.point(3 * i + 1);
        let c = points.point(3 * i + 2);

        let normal = face_normal(a, b, c);
        if !(normal.norm() > 0.0) {
            trace!("skipping degenerate triangle {}", i);
            stats.degenerate += 1;
            continue;
        }
        // Backface culling.
        if view.dot(&normal) <= 0.0 {
            stats.culled += 1;
            continue;
        }
        if projected_area(a, b, c) == 0.0 {
            trace!("skipping triangle {} with no projected area", i);
            stats.degenerate += 1;
            continue;
        }

        let color = shade(normal, lighting);
        scanline_triangle(pixels, depth, [a, b, c], color);
        stats.drawn += 1;
    }
    return stats;
}

/// Fills a triangle row by row, interpolating depth along its edges and spans.
fn scanline_triangle(
    pixels: &mut PixelBuffer,
    depth: &mut DepthBuffer,
    mut vertices: [Point3<f64>; 3],
    color: Color,
) {
    vertices.sort_by(|p, q| p.y.total_cmp(&q.y));
    let [bottom, middle, top] = vertices;

    let y_start = (bottom.y - EDGE_EPSILON).ceil().max(0.0);
    let y_end = (top.y + EDGE_EPSILON).floor().min(pixels.height() as f64 - 1.0);
    if y_start > y_end {
        return;
    }

    for y in y_start as i32..=y_end as i32 {
        let row = y as f64;
        // Long edge on one side, bottom-middle or middle-top on the other.
        let (x_long, z_long) = edge_at_row(bottom, top, row);
        let (x_short, z_short) = if row < middle.y {
            edge_at_row(bottom, middle, row)
        } else {
            edge_at_row(middle, top, row)
        };
        let ((x_left, z_left), (x_right, z_right)) = if x_long <= x_short {
            ((x_long, z_long), (x_short, z_short))
        } else {
            ((x_short, z_short), (x_long, z_long))
        };

        let x_start = (x_left - EDGE_EPSILON).ceil().max(0.0);
        let x_end = (x_right + EDGE_EPSILON).floor().min(pixels.width() as f64 - 1.0);
        if x_start > x_end {
            continue;
        }
        let span = x_right - x_left;
        for x in x_start as i32..=x_end as i32 {
            let z = if span > 0.0 {
                z_left + (z_right - z_left) * (x as f64 - x_left) / span
            } else {
                z_left.max(z_right)
            };
            // Checking z-buffer, on success redrawing the pixel.
            if depth.test_and_set(x, y, z) {
                pixels.set_pixel(x, y, color);
            }
        }
    }
}

/// Draws every consecutive column pair of `points` as a segment in a flat color.
///
/// Segments are hidden behind nearer solids but never write depth themselves,
/// so a later segment always draws over an earlier one.
pub fn draw_lines(
    points: &PointMatrix,
    pixels: &mut PixelBuffer,
    depth: &DepthBuffer,
    color: Color,
) -> DrawStats {
    let mut stats = DrawStats {
        ignored_columns: leftover_columns(points, 2, "lines"),
        ..Default::default()
    };
    for i in 0..points.len() / 2 {
        draw_line(pixels, depth, points.point(2 * i), points.point(2 * i + 1), color);
        stats.drawn += 1;
    }
    return stats;
}

/// Part of segment ab within the rectangle [x_min, x_max] x [y_min, y_max],
/// found with the Liang-Barsky parametric test. z follows the same parameter.
fn clip_segment(
    a: Point3<f64>,
    b: Point3<f64>,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) -> Option<(Point3<f64>, Point3<f64>)> {
    let d = b - a;
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;
    let boundaries = [
        (-d.x, a.x - x_min),
        (d.x, x_max - a.x),
        (-d.y, a.y - y_min),
        (d.y, y_max - a.y),
    ];
    for (p, q) in boundaries {
        if p == 0.0 {
            // Parallel to this boundary, and outside of it.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t_exit {
                return None;
            }
            t_enter = t_enter.max(t);
        } else {
            if t < t_enter {
                return None;
            }
            t_exit = t_exit.min(t);
        }
    }
    return Some((a + d * t_enter, a + d * t_exit));
}

/// Draws a line between a and b with specified color
/// via Bresenham's algorithm as presented in
/// https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm
/// with z interpolated along the way.
///
/// The segment is first clipped to the pixels it can round onto, so the walk
/// never leaves the buffer by more than one pixel.
fn draw_line(
    pixels: &mut PixelBuffer,
    depth: &DepthBuffer,
    a: Point3<f64>,
    b: Point3<f64>,
    color: Color,
) {
    if !(a.coords.iter().all(|v| v.is_finite()) && b.coords.iter().all(|v| v.is_finite())) {
        trace!("skipping line with non-finite endpoint {} -> {}", a, b);
        return;
    }
    let x_bounds = (-0.5, pixels.width() as f64 - 0.5);
    let y_bounds = (-0.5, pixels.height() as f64 - 0.5);
    let Some((a, b)) = clip_segment(a, b, x_bounds, y_bounds) else {
        return;
    };

    let mut x_0 = a.x.round() as i64;
    let mut y_0 = a.y.round() as i64;
    let x_1 = b.x.round() as i64;
    let y_1 = b.y.round() as i64;

    let dx: i64 = (x_1 - x_0).abs();
    let sx: i64 = if x_0 < x_1 { 1 } else { -1 };
    let dy: i64 = -(y_1 - y_0).abs();
    let sy: i64 = if y_0 < y_1 { 1 } else { -1 };
    let mut error: i64 = dx + dy;

    let steps = dx.max(-dy);
    let mut step = 0;
    loop {
        let z = if steps == 0 {
            a.z.max(b.z)
        } else {
            a.z + (b.z - a.z) * step as f64 / steps as f64
        };
        // Clipped coordinates lie within one pixel of the buffer.
        let (x, y) = (x_0 as i32, y_0 as i32);
        if pixels.in_bounds(x, y) && z >= depth.get(x, y) {
            pixels.set_pixel(x, y, color);
        }
        if x_0 == x_1 && y_0 == y_1 {
            break;
        }
        let e2 = 2 * error;
        if e2 >= dy {
            error += dy;
            x_0 += sx;
        }
        if e2 <= dx {
            error += dx;
            y_0 += sy;
        }
        step += 1;
    }
}
