//! Euclidean distance between points and point batches.

use crate::error::{GeometryError, Result};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Euclidean distance between two points of equal dimension.
///
/// # Formula
/// d(a, b) = sqrt(sum_i (a_i - b_i)^2)
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(GeometryError::ShapeMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt())
}

/// Row-wise Euclidean distances between two equal-shaped point batches.
///
/// Entry `i` of the result is the distance between row `i` of `a` and
/// row `i` of `b`.
pub fn distance_rows(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DVector<f64>> {
    check_same_shape(a, b)?;

    let dists: Vec<f64> = (0..a.nrows())
        .into_par_iter()
        .map(|i| (a.row(i) - b.row(i)).norm())
        .collect();

    Ok(DVector::from_vec(dists))
}

/// Distance between two equal-shaped arrays taken as flat vectors.
pub fn distance_flat(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64> {
    check_same_shape(a, b)?;
    Ok((a - b).norm())
}

fn check_same_shape(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<()> {
    if a.nrows() != b.nrows() {
        return Err(GeometryError::ShapeMismatch {
            expected: a.nrows(),
            actual: b.nrows(),
        });
    }
    if a.ncols() != b.ncols() {
        return Err(GeometryError::ShapeMismatch {
            expected: a.ncols(),
            actual: b.ncols(),
        });
    }
    Ok(())
}
