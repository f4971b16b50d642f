//! Multiplicative replacement of zeros in compositions.
//!
//! Zeros make log-ratios undefined. Multiplicative replacement swaps each
//! zero for a small value `delta` and shrinks the non-zero parts by the
//! common factor `1 - n_zeros * delta`, so the result is still closed and
//! ratios between non-zero parts are untouched.

use crate::error::{GeometryError, Result};
use crate::normalize::closure;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default numerator of the replacement value: `delta = scale / D^2`.
pub const DEFAULT_REPLACEMENT_SCALE: f64 = 0.1;

/// Configuration for multiplicative replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacementConfig {
    /// Fixed replacement value. When unset, `scale / D^2` is used.
    pub delta: Option<f64>,
    /// Numerator of the dimension-dependent default.
    pub scale: f64,
}

impl Default for ReplacementConfig {
    fn default() -> Self {
        Self {
            delta: None,
            scale: DEFAULT_REPLACEMENT_SCALE,
        }
    }
}

impl ReplacementConfig {
    /// Replacement value for compositions with `n_parts` parts.
    pub fn delta_for(&self, n_parts: usize) -> f64 {
        self.delta
            .unwrap_or_else(|| self.scale / (n_parts as f64).powi(2))
    }
}

/// Replace zeros in a composition with `delta`, keeping it closed.
///
/// The input is closed first, so raw counts are accepted. Without an
/// explicit `delta` the default `0.1 / D^2` is used.
///
/// # Errors
/// - `Domain` if every part is zero or any part is negative
/// - `InvalidArgument` for non-finite parts, `delta <= 0`, or a `delta`
///   so large that the zeros would absorb the whole composition
///
/// # Example
/// ```
/// use compositional_geometry::zero::multiplicative_replacement;
///
/// let replaced = multiplicative_replacement(&[0.5, 0.0, 0.5], None).unwrap();
/// assert!(replaced.iter().all(|&v| v > 0.0));
/// assert!((replaced.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn multiplicative_replacement(x: &[f64], delta: Option<f64>) -> Result<DVector<f64>> {
    let config = ReplacementConfig {
        delta,
        ..ReplacementConfig::default()
    };
    multiplicative_replacement_with_config(x, &config)
}

/// Multiplicative replacement with an explicit configuration.
pub fn multiplicative_replacement_with_config(
    x: &[f64],
    config: &ReplacementConfig,
) -> Result<DVector<f64>> {
    let closed = closure(x)?;
    let n_parts = closed.len();
    let n_zeros = closed.iter().filter(|&&v| v == 0.0).count();

    if n_zeros == 0 {
        return Ok(closed);
    }

    let delta = config.delta_for(n_parts);
    if !delta.is_finite() || delta <= 0.0 {
        return Err(GeometryError::InvalidArgument(format!(
            "Replacement value must be positive, got {}",
            delta
        )));
    }

    let shrink = 1.0 - n_zeros as f64 * delta;
    if shrink <= 0.0 {
        return Err(GeometryError::InvalidArgument(format!(
            "Replacement value {} is too large for {} zeros",
            delta, n_zeros
        )));
    }

    Ok(closed.map(|v| if v == 0.0 { delta } else { v * shrink }))
}

/// Apply multiplicative replacement to every row of an N × D matrix.
pub fn multiplicative_replacement_rows(
    data: &DMatrix<f64>,
    config: &ReplacementConfig,
) -> Result<DMatrix<f64>> {
    let (n_rows, n_parts) = data.shape();
    if n_rows == 0 || n_parts == 0 {
        return Err(GeometryError::EmptyData(
            "Cannot replace zeros in empty matrix".to_string(),
        ));
    }

    let rows: Vec<DVector<f64>> = (0..n_rows)
        .into_par_iter()
        .map(|i| {
            let row: Vec<f64> = data.row(i).iter().copied().collect();
            multiplicative_replacement_with_config(&row, config).map_err(|e| match e {
                GeometryError::Domain(msg) => GeometryError::Domain(format!("row {}: {}", i, msg)),
                other => other,
            })
        })
        .collect::<Result<_>>()?;

    Ok(DMatrix::from_fn(n_rows, n_parts, |i, j| rows[i][j]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::clr;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_zero() {
        let x = [0.05, 0.1, 0.15, 0.0, 0.2, 0.22, 0.28];
        let u = multiplicative_replacement(&x, None).unwrap();

        assert_relative_eq!(u.sum(), 1.0, epsilon = 1e-12);
        assert!(u.iter().all(|&v| v > 0.0));
        assert_relative_eq!(u[3], 0.1 / 49.0, epsilon = 1e-15);
        for (a, b) in x.iter().zip(u.iter()) {
            assert!((a - b).abs() <= 1e-2);
        }
        // clr is now defined
        assert!(clr(u.as_slice()).is_ok());
    }

    #[test]
    fn test_ratios_preserved() {
        let u = multiplicative_replacement(&[0.2, 0.0, 0.6, 0.0, 0.2], Some(0.01)).unwrap();
        assert_relative_eq!(u[1], 0.01, epsilon = 1e-15);
        assert_relative_eq!(u[3], 0.01, epsilon = 1e-15);
        assert_relative_eq!(u[2] / u[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(u[0], 0.2 * 0.98, epsilon = 1e-15);
    }

    #[test]
    fn test_no_zeros_unchanged() {
        let u = multiplicative_replacement(&[1.0, 3.0], None).unwrap();
        assert_relative_eq!(u[0], 0.25, epsilon = 1e-15);
        assert_relative_eq!(u[1], 0.75, epsilon = 1e-15);
    }

    #[test]
    fn test_unclosed_input() {
        let u = multiplicative_replacement(&[10.0, 0.0, 30.0], None).unwrap();
        assert_relative_eq!(u.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_all_zero_fails() {
        assert!(matches!(
            multiplicative_replacement(&[0.0, 0.0, 0.0], None),
            Err(GeometryError::Domain(_))
        ));
    }

    #[test]
    fn test_invalid_delta() {
        assert!(matches!(
            multiplicative_replacement(&[0.5, 0.0, 0.5], Some(0.0)),
            Err(GeometryError::InvalidArgument(_))
        ));
        assert!(matches!(
            multiplicative_replacement(&[1.0, 0.0, 0.0], Some(0.5)),
            Err(GeometryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rows() {
        let data = DMatrix::from_row_slice(2, 3, &[0.5, 0.5, 0.0, 0.2, 0.3, 0.5]);
        let result = multiplicative_replacement_rows(&data, &ReplacementConfig::default()).unwrap();
        assert!(result.iter().all(|&v| v > 0.0));
        for row in result.row_iter() {
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(result[(1, 2)], 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_rows_all_zero_sample_fails() {
        let data = DMatrix::from_row_slice(2, 3, &[0.2, 0.3, 0.5, 0.0, 0.0, 0.0]);
        match multiplicative_replacement_rows(&data, &ReplacementConfig::default()) {
            Err(GeometryError::Domain(msg)) => assert!(msg.starts_with("row 1")),
            other => panic!("expected Domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_delta() {
        let config = ReplacementConfig::default();
        assert_relative_eq!(config.delta_for(10), 0.001, epsilon = 1e-15);
        let fixed = ReplacementConfig {
            delta: Some(0.005),
            ..ReplacementConfig::default()
        };
        assert_eq!(fixed.delta_for(10), 0.005);
    }
}
