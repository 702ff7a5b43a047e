//! Elementary transformation matrices in homogeneous coordinates.
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Coordinate axis a rotation is performed around.
///
/// Reads either a name (`"x"`) or a numeric selector (`0`) and always writes
/// the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "AxisSelector")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Either spelling of an axis found in operation records.
#[derive(Deserialize)]
#[serde(untagged)]
enum AxisSelector {
    Index(i64),
    Name(AxisName),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum AxisName {
    X,
    Y,
    Z,
}

impl TryFrom<AxisSelector> for Axis {
    type Error = RenderError;

    fn try_from(selector: AxisSelector) -> Result<Self, Self::Error> {
        return match selector {
            AxisSelector::Index(index) => Axis::try_from(index),
            AxisSelector::Name(AxisName::X) => Ok(Axis::X),
            AxisSelector::Name(AxisName::Y) => Ok(Axis::Y),
            AxisSelector::Name(AxisName::Z) => Ok(Axis::Z),
        };
    }
}

/// Numeric selectors, as emitted by the script front end: 0 = x, 1 = y, 2 = z.
impl TryFrom<i64> for Axis {
    type Error = RenderError;

    fn try_from(selector: i64) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(RenderError::UnknownAxis(other)),
        }
    }
}

pub fn identity() -> Matrix4<f64> {
    return Matrix4::identity();
}

pub fn translation(dx: f64, dy: f64, dz: f64) -> Matrix4<f64> {
    return Matrix4::new_translation(&Vector3::new(dx, dy, dz));
}

pub fn scale(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
    return Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
}

/// Counter-clockwise rotation around x, looking from +x towards the origin.
pub fn rotation_x(radians: f64) -> Matrix4<f64> {
    return Matrix4::from_axis_angle(&Vector3::x_axis(), radians);
}

pub fn rotation_y(radians: f64) -> Matrix4<f64> {
    return Matrix4::from_axis_angle(&Vector3::y_axis(), radians);
}

pub fn rotation_z(radians: f64) -> Matrix4<f64> {
    return Matrix4::from_axis_angle(&Vector3::z_axis(), radians);
}

/// Rotation around `axis` by an angle given in degrees.
pub fn rotation(axis: Axis, degrees: f64) -> Matrix4<f64> {
    let radians = degrees.to_radians();
    return match axis {
        Axis::X => rotation_x(radians),
        Axis::Y => rotation_y(radians),
        Axis::Z => rotation_z(radians),
    };
}

/// Applies `local` on top of the accumulated `frame`: points are first mapped
/// by `local`, then by `frame`.
pub fn compose(frame: &Matrix4<f64>, local: &Matrix4<f64>) -> Matrix4<f64> {
    return frame * local;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_translation_moves_points() {
        let m = translation(1.0, -2.0, 3.0);
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3::new(2.0, -1.0, 4.0));
    }

    #[test]
    fn test_scale_is_per_axis() {
        let m = scale(2.0, 3.0, 0.5);
        let p = m.transform_point(&Point3::new(1.0, 1.0, 4.0));
        assert_eq!(p, Point3::new(2.0, 3.0, 2.0));
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let p = rotation(Axis::Z, 90.0).transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_rotation_x_and_y_quarter_turn() {
        let p = rotation(Axis::X, 90.0).transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, 1.0)).norm() < EPS);
        let p = rotation(Axis::Y, 90.0).transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert!((p - Point3::new(1.0, 0.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_rotation_and_inverse_cancel() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let frame = compose(&translation(3.0, 4.0, 5.0), &rotation(axis, 37.5));
            let back = compose(&frame, &rotation(axis, -37.5));
            assert!((back - translation(3.0, 4.0, 5.0)).norm() < EPS);
        }
    }

    #[test]
    fn test_compose_applies_local_first() {
        // Scale in the local frame, then move: the translation is not scaled.
        let m = compose(&translation(10.0, 0.0, 0.0), &scale(2.0, 2.0, 2.0));
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Point3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_axis_selectors() {
        assert_eq!(Axis::try_from(0).unwrap(), Axis::X);
        assert_eq!(Axis::try_from(2).unwrap(), Axis::Z);
        assert!(matches!(Axis::try_from(3), Err(RenderError::UnknownAxis(3))));
    }
}
