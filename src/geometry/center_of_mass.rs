//! Weighted centroid of a point cloud.
//!
//! Two input layouts are supported: a single matrix in which one column
//! carries the weights, or a coordinate matrix with a separate weight slice.
//! [`center_of_mass`] dispatches between them.

use crate::error::{normalize_index, GeometryError, Result};
use nalgebra::{DMatrix, DVector};

/// Input layouts accepted by [`center_of_mass`].
#[derive(Debug, Clone, Copy)]
pub enum MassInput<'a> {
    /// One point per row; column `weight_index` holds the weight and every
    /// other column is a coordinate.
    Combined {
        points: &'a DMatrix<f64>,
        weight_index: isize,
    },
    /// Coordinates (one point per row) and one weight per row.
    Split {
        coords: &'a DMatrix<f64>,
        weights: &'a [f64],
    },
}

impl<'a> MassInput<'a> {
    /// Combined layout with the weight in the last column.
    pub fn combined(points: &'a DMatrix<f64>) -> Self {
        MassInput::Combined {
            points,
            weight_index: -1,
        }
    }
}

/// Compute the center of mass for either input layout.
///
/// Results are identical to calling [`center_of_mass_one_array`] or
/// [`center_of_mass_two_array`] directly.
pub fn center_of_mass(input: MassInput<'_>) -> Result<DVector<f64>> {
    match input {
        MassInput::Combined {
            points,
            weight_index,
        } => center_of_mass_one_array(points, weight_index),
        MassInput::Split { coords, weights } => center_of_mass_two_array(coords, weights),
    }
}

/// Center of mass of a matrix whose column `weight_index` holds weights.
///
/// Negative indices count from the last column (`-1` = last). The
/// remaining columns, in their original order, form the coordinates.
///
/// # Example
/// ```
/// use compositional_geometry::geometry::center_of_mass_one_array;
/// use nalgebra::DMatrix;
///
/// let points = DMatrix::from_row_slice(3, 3, &[
///     1.0, 1.0, 1.0,
///     3.0, 1.0, 1.0,
///     2.0, 3.0, 2.0,
/// ]);
/// let com = center_of_mass_one_array(&points, -1).unwrap();
/// assert_eq!(com.as_slice(), &[2.0, 2.0]);
/// ```
pub fn center_of_mass_one_array(points: &DMatrix<f64>, weight_index: isize) -> Result<DVector<f64>> {
    let (n_points, n_cols) = points.shape();
    let w_idx = normalize_index(weight_index, n_cols)?;

    if n_cols < 2 {
        return Err(GeometryError::InvalidArgument(
            "Combined input needs at least one coordinate column besides the weight".to_string(),
        ));
    }
    if n_points == 0 {
        return Err(GeometryError::InvalidArgument(
            "Cannot compute center of mass of an empty point cloud".to_string(),
        ));
    }

    let coord_cols: Vec<usize> = (0..n_cols).filter(|&j| j != w_idx).collect();
    let coords = points.select_columns(coord_cols.iter());
    let weights: Vec<f64> = points.column(w_idx).iter().copied().collect();

    center_of_mass_two_array(&coords, &weights)
}

/// Center of mass of `coords` (one point per row) with one weight per row.
pub fn center_of_mass_two_array(coords: &DMatrix<f64>, weights: &[f64]) -> Result<DVector<f64>> {
    let (n_points, n_dims) = coords.shape();

    if weights.len() != n_points {
        return Err(GeometryError::ShapeMismatch {
            expected: n_points,
            actual: weights.len(),
        });
    }
    if n_points == 0 || n_dims == 0 {
        return Err(GeometryError::InvalidArgument(
            "Cannot compute center of mass of an empty point cloud".to_string(),
        ));
    }

    if let Some((i, w)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
        return Err(GeometryError::InvalidArgument(format!(
            "Weight {} at row {} is not a finite number",
            w, i
        )));
    }
    if coords.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::InvalidArgument(
            "Coordinates must be finite numbers".to_string(),
        ));
    }

    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Err(GeometryError::Domain(
            "Total weight is zero; center of mass is undefined".to_string(),
        ));
    }

    let w = DVector::from_column_slice(weights);
    // (N x D)^T * (N) -> D
    Ok(coords.tr_mul(&w) / total)
}
