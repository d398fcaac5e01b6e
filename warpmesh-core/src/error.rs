/// Error types for selection and mesh loading
use thiserror::Error;

/// Result type alias for selector operations.
pub type SelectResult<T> = Result<T, SelectError>;

/// Errors raised by the vertex selector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    /// A projection was needed but no camera is bound (or it was dropped).
    #[error("no camera bound; set a camera before picking vertices")]
    NoCameraBound,

    /// Nudge increments must be finite and positive.
    #[error("invalid increment {0}: must be finite and greater than zero")]
    InvalidIncrement(f32),
}

/// Errors raised while reading STL data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),

    #[error("unexpected end of file after {parsed} of {expected} triangles")]
    Truncated { parsed: usize, expected: usize },

    #[error("failed to parse ASCII STL: {0}")]
    Malformed(String),
}
