//! Centered Log-Ratio (CLR) transformation and its inverse.

use super::closure::{check_finite, check_positive};
use crate::error::{GeometryError, Result};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Apply the Centered Log-Ratio transformation to one composition.
///
/// # Formula
/// CLR(x)_i = log(x_i) - mean_j(log(x_j))
///
/// The result lies on the hyperplane `sum(y) = 0`. The input need not be
/// closed; CLR is invariant to rescaling.
///
/// # Errors
/// Returns `Domain` if any part is zero or negative.
pub fn clr(x: &[f64]) -> Result<DVector<f64>> {
    check_positive(x, "CLR")?;

    let logs = DVector::from_iterator(x.len(), x.iter().map(|v| v.ln()));
    let mean_log = logs.mean();
    Ok(logs.add_scalar(-mean_log))
}

/// Invert CLR: exponentiate and close to sum 1.
///
/// For `y` on the zero-sum hyperplane, `clr(clr_inv(y)) == y`.
pub fn clr_inv(y: &[f64]) -> Result<DVector<f64>> {
    check_finite(y)?;

    // Shift by the maximum so the largest exponent is exp(0)
    let max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps = DVector::from_iterator(y.len(), y.iter().map(|v| (v - max).exp()));
    let total = exps.sum();
    Ok(exps / total)
}

/// Apply CLR to every row of an N × D matrix of compositions.
pub fn clr_rows(data: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (n_rows, n_parts) = data.shape();
    if n_rows == 0 || n_parts == 0 {
        return Err(GeometryError::EmptyData(
            "Cannot apply CLR to empty matrix".to_string(),
        ));
    }

    let rows: Vec<DVector<f64>> = (0..n_rows)
        .into_par_iter()
        .map(|i| {
            let row: Vec<f64> = data.row(i).iter().copied().collect();
            clr(&row).map_err(|e| match e {
                GeometryError::Domain(msg) => GeometryError::Domain(format!("row {}: {}", i, msg)),
                other => other,
            })
        })
        .collect::<Result<_>>()?;

    Ok(DMatrix::from_fn(n_rows, n_parts, |i, j| rows[i][j]))
}
