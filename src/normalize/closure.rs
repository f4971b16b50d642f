//! Closure: rescaling a vector of parts onto the unit simplex.

use crate::error::{GeometryError, Result};
use nalgebra::DVector;

/// Rescale non-negative parts so they sum to 1.
///
/// # Errors
/// - `InvalidArgument` for empty input or non-finite parts
/// - `Domain` for negative parts or an all-zero vector
pub fn closure(x: &[f64]) -> Result<DVector<f64>> {
    check_finite(x)?;
    if let Some((i, v)) = x.iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(GeometryError::Domain(format!(
            "Composition parts must be non-negative; found {} at {}",
            v, i
        )));
    }

    let total: f64 = x.iter().sum();
    if total <= 0.0 {
        return Err(GeometryError::Domain(
            "Composition has no positive parts".to_string(),
        ));
    }

    Ok(DVector::from_iterator(x.len(), x.iter().map(|v| v / total)))
}

/// Reject empty or non-finite input.
pub(crate) fn check_finite(x: &[f64]) -> Result<()> {
    if x.is_empty() {
        return Err(GeometryError::InvalidArgument(
            "Vector has no components".to_string(),
        ));
    }
    if let Some((i, v)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(GeometryError::InvalidArgument(format!(
            "Component {} is not finite ({})",
            i, v
        )));
    }
    Ok(())
}

/// Log-ratio transforms need strictly positive parts.
pub(crate) fn check_positive(x: &[f64], transform: &str) -> Result<()> {
    check_finite(x)?;
    if let Some((i, v)) = x.iter().enumerate().find(|(_, v)| **v <= 0.0) {
        return Err(GeometryError::Domain(format!(
            "{} requires positive values; found {} at {}",
            transform, v, i
        )));
    }
    Ok(())
}
