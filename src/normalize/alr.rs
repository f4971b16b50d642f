//! Additive Log-Ratio (ALR) transformation and its inverse.
//!
//! ALR takes the log-ratio of each part relative to a reference part. The
//! reference is chosen by index; negative indices count from the end, so
//! `-1` selects the last part.
//!
//! | Property | CLR | ALR |
//! |----------|-----|-----|
//! | Output dimensions | D | D-1 |
//! | Sum constraint | Sums to zero | None |
//! | Reference | Geometric mean | Single part |

use super::closure::{check_finite, check_positive};
use super::clr::clr_inv;
use crate::error::{normalize_index, GeometryError, Result};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Apply the Additive Log-Ratio transformation to one composition.
///
/// # Formula
/// ALR(x)_i = log(x_i / x_ref), for every i != ref
///
/// # Errors
/// - `InvalidArgument` when there are fewer than two parts
/// - `OutOfRange` when `ref_index` is outside `[-D, D-1]`
/// - `Domain` when any part is zero or negative
pub fn alr(x: &[f64], ref_index: isize) -> Result<DVector<f64>> {
    if x.len() < 2 {
        return Err(GeometryError::InvalidArgument(
            "ALR requires at least 2 parts".to_string(),
        ));
    }
    let r = normalize_index(ref_index, x.len())?;
    check_positive(x, "ALR")?;

    let log_ref = x[r].ln();
    Ok(DVector::from_iterator(
        x.len() - 1,
        x.iter()
            .enumerate()
            .filter(|(i, _)| *i != r)
            .map(|(_, v)| v.ln() - log_ref),
    ))
}

/// Invert ALR, returning a closed composition with `y.len() + 1` parts.
///
/// `ref_index` is resolved against the length of the recovered
/// composition, so `alr(alr_inv(y, r), r) == y` for every valid `r`.
pub fn alr_inv(y: &[f64], ref_index: isize) -> Result<DVector<f64>> {
    check_finite(y)?;
    let n_parts = y.len() + 1;
    let r = normalize_index(ref_index, n_parts)?;

    // Reference part has log-ratio 0 with itself
    let mut logs = Vec::with_capacity(n_parts);
    logs.extend_from_slice(&y[..r]);
    logs.push(0.0);
    logs.extend_from_slice(&y[r..]);

    clr_inv(&logs)
}

/// Apply ALR to every row of an N × D matrix of compositions.
pub fn alr_rows(data: &DMatrix<f64>, ref_index: isize) -> Result<DMatrix<f64>> {
    let (n_rows, n_parts) = data.shape();
    if n_rows == 0 {
        return Err(GeometryError::EmptyData(
            "Cannot apply ALR to empty matrix".to_string(),
        ));
    }
    if n_parts < 2 {
        return Err(GeometryError::InvalidArgument(
            "ALR requires at least 2 parts".to_string(),
        ));
    }

    let rows: Vec<DVector<f64>> = (0..n_rows)
        .into_par_iter()
        .map(|i| {
            let row: Vec<f64> = data.row(i).iter().copied().collect();
            alr(&row, ref_index).map_err(|e| match e {
                GeometryError::Domain(msg) => GeometryError::Domain(format!("row {}: {}", i, msg)),
                other => other,
            })
        })
        .collect::<Result<_>>()?;

    Ok(DMatrix::from_fn(n_rows, n_parts - 1, |i, j| rows[i][j]))
}
