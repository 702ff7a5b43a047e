//! Interpreter and software rasterizer for parsed drawing scripts.
//!
//! A script is a sequence of [`ops::Operation`] records. Frame operations
//! (push, pop, move, scale, rotate) edit a stack of coordinate systems, solids
//! and lines are tessellated in the current system and rasterized into a pixel
//! buffer with a depth buffer and flat shading.

pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod interpreter;
pub mod matrix;
pub mod ops;
pub mod scene;
pub mod stack;
pub mod transform;

pub use config::{Light, Lighting, RenderConfig};
pub use error::{RenderError, Result};
pub use interpreter::{render, Interpreter, Persist, Present};
pub use ops::Operation;
pub use scene::{Color, DepthBuffer, DrawStats, PixelBuffer};
