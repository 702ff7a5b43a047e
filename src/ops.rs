//! Operation records produced by the script front end.
//!
//! Scripts are exchanged as a JSON array of records tagged by `op`, e.g.
//! `{"op": "sphere", "center": [0, 0, 0], "radius": 50}`.

use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transform::Axis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Open a local frame inheriting the current one.
    Push,
    /// Close the current local frame.
    Pop,
    Move {
        offset: Vector3<f64>,
    },
    Scale {
        factors: Vector3<f64>,
    },
    Rotate {
        axis: Axis,
        degrees: f64,
    },
    Box {
        corner_0: Point3<f64>,
        corner_1: Point3<f64>,
    },
    Sphere {
        center: Point3<f64>,
        radius: f64,
    },
    Torus {
        center: Point3<f64>,
        inner_radius: f64,
        outer_radius: f64,
    },
    Line {
        p0: Point3<f64>,
        p1: Point3<f64>,
    },
    Save {
        name: String,
    },
    Display,
}

impl Operation {
    /// Lowercase kind name, as used for the `op` tag.
    pub fn kind(&self) -> &'static str {
        return match self {
            Operation::Push => "push",
            Operation::Pop => "pop",
            Operation::Move { .. } => "move",
            Operation::Scale { .. } => "scale",
            Operation::Rotate { .. } => "rotate",
            Operation::Box { .. } => "box",
            Operation::Sphere { .. } => "sphere",
            Operation::Torus { .. } => "torus",
            Operation::Line { .. } => "line",
            Operation::Save { .. } => "save",
            Operation::Display => "display",
        };
    }
}

/// Parses a JSON array of operation records.
pub fn parse_script(text: &str) -> Result<Vec<Operation>> {
    return Ok(serde_json::from_str(text)?);
}

/// Reads and parses a JSON script file.
pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<Operation>> {
    let text = fs::read_to_string(path)?;
    return parse_script(&text);
}
