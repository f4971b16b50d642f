//! Error types for the compositional-geometry library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} out of range for length {len}")]
    OutOfRange { index: isize, len: usize },

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Simplex fit infeasible: {0}")]
    FitInfeasible(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid value '{value}' at row {row}, column {col}")]
    InvalidValue {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Resolve a possibly negative index against a sequence of length `len`.
///
/// `-1` refers to the last element, `-len` to the first.
pub fn normalize_index(index: isize, len: usize) -> Result<usize> {
    let signed_len = len as isize;
    let resolved = if index < 0 { signed_len + index } else { index };
    if resolved < 0 || resolved >= signed_len {
        return Err(GeometryError::OutOfRange { index, len });
    }
    Ok(resolved as usize)
}
