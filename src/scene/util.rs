use nalgebra as na;
use na::{vector, Point3, Vector3};

use super::Color;

/// Color as a float vector, one component per channel.
pub fn color_to_vector(color: Color) -> Vector3<f64> {
    return vector![color.r as f64, color.g as f64, color.b as f64];
}

/// Clamps every channel to [0, 255] and truncates it to a byte.
pub fn vector_to_color(v: Vector3<f64>) -> Color {
    fn channel(value: f64) -> u8 {
        // NaN turns into 0 through the saturating cast.
        return value.clamp(0.0, 255.0) as u8;
    }
    return Color {
        r: channel(v.x),
        g: channel(v.y),
        b: channel(v.z),
    };
}

/// Unnormalized face normal of a triangle, following its winding.
pub fn face_normal(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Vector3<f64> {
    return (b - a).cross(&(c - a));
}

/// Twice the signed area of the triangle's projection onto the xy plane.
pub fn projected_area(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> f64 {
    return (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
}

/// x and z where the edge from `a` to `b` crosses the row `y`.
/// A horizontal edge yields its start point.
pub fn edge_at_row(a: Point3<f64>, b: Point3<f64>, y: f64) -> (f64, f64) {
    let dy = b.y - a.y;
    if dy == 0.0 {
        return (a.x, a.z);
    }
    let offset = y - a.y;
    return (a.x + (b.x - a.x) * offset / dy, a.z + (b.z - a.z) * offset / dy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::point;

    #[test]
    fn test_vector_to_color_clamps() {
        let c = vector_to_color(vector![-20.0, 127.9, 900.0]);
        assert_eq!((c.r, c.g, c.b), (0, 127, 255));
    }

    #[test]
    fn test_edge_at_row_interpolates_x_and_z() {
        let (x, z) = edge_at_row(point![0.0, 0.0, 0.0], point![10.0, 20.0, -4.0], 5.0);
        assert!((x - 2.5).abs() < 1e-12);
        assert!((z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_projected_area_sign_follows_winding() {
        let a = point![0.0, 0.0, 0.0];
        let b = point![1.0, 0.0, 5.0];
        let c = point![0.0, 1.0, -5.0];
        assert!(projected_area(a, b, c) > 0.0);
        assert!(projected_area(a, c, b) < 0.0);
    }
}
