//! Settings fixed for the duration of one render pass.
//!
//! Everything can be read from a JSON file; missing fields fall back to the
//! defaults below.

use std::fs;
use std::path::Path;

use nalgebra::{vector, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::scene::Color;

/// A light source. `location` is used as the direction towards the light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub location: Vector3<f64>,
    pub color: Color,
}

impl Default for Light {
    fn default() -> Self {
        return Self {
            location: vector![0.5, 0.75, 1.0],
            color: Color { r: 0, g: 255, b: 255 },
        };
    }
}

/// Illumination model parameters shared by every solid of the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    pub ambient: Color,
    pub lights: Vec<Light>,
    /// Direction towards the viewer.
    pub view: Vector3<f64>,
    // Reflectance per channel.
    pub areflect: Vector3<f64>,
    pub dreflect: Vector3<f64>,
    pub sreflect: Vector3<f64>,
    pub specular_exponent: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        return Self {
            ambient: Color { r: 50, g: 50, b: 50 },
            lights: vec![Light::default()],
            view: vector![0.0, 0.0, 1.0],
            areflect: vector![0.1, 0.1, 0.1],
            dreflect: vector![0.5, 0.5, 0.5],
            sreflect: vector![0.5, 0.5, 0.5],
            specular_exponent: 4.0,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Subdivisions per half revolution for spheres and tori.
    pub step: usize,
    pub background: Color,
    /// Flat color of LINE segments.
    pub line_color: Color,
    /// Columns the scratch point matrix starts out with.
    pub initial_columns: usize,
    /// Columns the scratch point matrix may never grow past.
    pub max_columns: usize,
    pub lighting: Lighting,
}

impl Default for RenderConfig {
    fn default() -> Self {
        return Self {
            width: 500,
            height: 500,
            step: 20,
            background: Color { r: 0, g: 0, b: 0 },
            line_color: Color { r: 255, g: 255, b: 255 },
            initial_columns: 1000,
            max_columns: 1 << 24,
            lighting: Lighting::default(),
        };
    }
}

impl RenderConfig {
    /// Reads a JSON configuration file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        return Ok(config);
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(message: &str) -> Result<()> {
            return Err(RenderError::InvalidConfig(message.to_string()));
        }

        if self.width == 0 || self.height == 0 {
            return invalid("pixel buffer dimensions must be non-zero");
        }
        if self.step < 2 {
            return invalid("tessellation step must be at least 2");
        }
        if self.initial_columns > self.max_columns {
            return invalid("initial_columns exceeds max_columns");
        }
        if self.lighting.view.norm() == 0.0 {
            return invalid("view vector must not be zero");
        }
        if self.lighting.lights.iter().any(|light| light.location.norm() == 0.0) {
            return invalid("light location must not be the origin");
        }
        return Ok(());
    }
}
