use nalgebra::Matrix4;

use crate::error::{RenderError, Result};
use crate::transform;

/// Stack of accumulated transforms, one per nested local coordinate system.
///
/// The bottom frame is the identity (world space) and can never be popped.
#[derive(Debug, Clone)]
pub struct FrameStack {
    frames: Vec<Matrix4<f64>>,
}

impl FrameStack {
    pub fn new() -> Self {
        return Self {
            frames: vec![transform::identity()],
        };
    }

    /// Opens a new local frame that starts out as a copy of the current one.
    pub fn push(&mut self) {
        let top = *self.peek();
        self.frames.push(top);
    }

    /// Closes the current local frame.
    pub fn pop(&mut self) -> Result<()> {
        if self.frames.len() == 1 {
            return Err(RenderError::StackUnderflow);
        }
        self.frames.pop();
        return Ok(());
    }

    /// Current accumulated transform.
    pub fn peek(&self) -> &Matrix4<f64> {
        // Never empty: new() seeds one frame and pop() refuses to remove it.
        return &self.frames[self.frames.len() - 1];
    }

    /// Replaces the current frame `F` by `F * local`, leaving the depth as is.
    pub fn apply(&mut self, local: &Matrix4<f64>) {
        let last = self.frames.len() - 1;
        self.frames[last] = transform::compose(&self.frames[last], local);
    }

    pub fn depth(&self) -> usize {
        return self.frames.len();
    }
}

impl Default for FrameStack {
    fn default() -> Self {
        Self::new()
    }
}
