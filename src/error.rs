use std::path::PathBuf;

/// Fatal conditions of a render pass.
///
/// Recoverable conditions (triangles with no area, point lists whose length is
/// not a whole number of primitives) never show up here, they are counted in
/// [`crate::scene::DrawStats`] and logged instead.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("pop would leave the coordinate-frame stack empty")]
    StackUnderflow,

    #[error("point matrix needs {requested} columns but is capped at {limit}")]
    BufferCapacityExceeded { requested: usize, limit: usize },

    #[error("rotation axis selector {0} is not one of 0 (x), 1 (y), 2 (z)")]
    UnknownAxis(i64),

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to save image to {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to display image: {0}")]
    Display(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed JSON input: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
