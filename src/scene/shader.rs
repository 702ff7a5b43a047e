// Flat shading: one color per triangle from its face normal, using ambient,
// diffuse and specular terms of every configured light.

use nalgebra::Vector3;

use super::util::{color_to_vector, vector_to_color};
use super::Color;
use crate::config::Lighting;

/// Ambient contribution alone, before clamping.
pub fn ambient_term(lighting: &Lighting) -> Vector3<f64> {
    return color_to_vector(lighting.ambient).component_mul(&lighting.areflect);
}

/// Color of a surface with the given (not necessarily unit) normal.
pub fn shade(normal: Vector3<f64>, lighting: &Lighting) -> Color {
    let normal = normal.normalize();
    let view = lighting.view.normalize();

    let mut total = ambient_term(lighting);
    for light in &lighting.lights {
        let light_direction = light.location.normalize();
        let light_color = color_to_vector(light.color);
        let n_dot_l = normal.dot(&light_direction);

        let diffuse = light_color.component_mul(&lighting.dreflect) * n_dot_l.max(0.0);

        // Light direction mirrored around the normal.
        let reflected = 2.0 * n_dot_l * normal - light_direction;
        let spec_coef = reflected.dot(&view).max(0.0).powf(lighting.specular_exponent);
        let specular = light_color.component_mul(&lighting.sreflect) * spec_coef;

        total += diffuse + specular;
    }
    return vector_to_color(total);
}
