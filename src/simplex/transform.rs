//! Orthonormal basis of the zero-sum hyperplane.
//!
//! A D-part composition lives on the hyperplane `sum(x) = 1`; differences
//! of compositions (and CLR vectors) live on `sum(x) = 0`. The
//! [`SimplexTransform`] maps such vectors isometrically onto
//! `(D-1)`-dimensional Euclidean space using Helmert contrasts, so that
//! ordinary Euclidean tools can be applied to compositional data.

use crate::error::{GeometryError, Result};
use log::debug;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

static TRANSFORM_CACHE: OnceLock<RwLock<HashMap<usize, Arc<SimplexTransform>>>> = OnceLock::new();

/// Isometric map between D-dimensional ambient space and the
/// `(D-1)`-dimensional coordinates of the zero-sum hyperplane.
///
/// The basis is stored as a D × (D-1) matrix `M` with orthonormal columns,
/// each orthogonal to the all-ones vector. Row vectors are mapped as
/// `x · M`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexTransform {
    dim: usize,
    matrix: DMatrix<f64>,
}

impl Default for SimplexTransform {
    fn default() -> Self {
        Self::helmert(4)
    }
}

impl SimplexTransform {
    /// Build the transform for compositions with `dim` parts.
    pub fn new(dim: usize) -> Result<Self> {
        if dim < 2 {
            return Err(GeometryError::InvalidArgument(format!(
                "Simplex transform requires at least 2 parts, got {}",
                dim
            )));
        }
        Ok(Self::helmert(dim))
    }

    /// Shared transform for `dim` parts, built once per process.
    pub fn for_dimension(dim: usize) -> Result<Arc<Self>> {
        let cache = TRANSFORM_CACHE.get_or_init(|| RwLock::new(HashMap::new()));

        {
            let read = cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(transform) = read.get(&dim) {
                return Ok(Arc::clone(transform));
            }
        }

        let transform = Arc::new(Self::new(dim)?);
        let mut write = cache.write().unwrap_or_else(|e| e.into_inner());
        let entry = write.entry(dim).or_insert_with(|| {
            debug!("Caching simplex transform for {} parts", dim);
            transform
        });
        Ok(Arc::clone(entry))
    }

    // Column k: 1/sqrt((k+1)(k+2)) in rows 0..=k, -(k+1)/sqrt((k+1)(k+2)) in row k+1.
    fn helmert(dim: usize) -> Self {
        let mut matrix = DMatrix::zeros(dim, dim - 1);
        for k in 0..dim - 1 {
            let n = (k + 1) as f64;
            let norm = (n * (n + 1.0)).sqrt();
            for row in 0..=k {
                matrix[(row, k)] = 1.0 / norm;
            }
            matrix[(k + 1, k)] = -n / norm;
        }
        Self { dim, matrix }
    }

    /// Number of parts D of the ambient space.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Dimension of the reduced Euclidean representation (D - 1).
    pub fn reduced_dim(&self) -> usize {
        self.dim - 1
    }

    /// The D × (D-1) basis matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Images of the D unit vectors: the vertices of a regular simplex
    /// with edge length `sqrt(2)`, one per row.
    pub fn vertices(&self) -> DMatrix<f64> {
        self.matrix.clone()
    }

    /// Map a D-dimensional vector to reduced coordinates.
    pub fn apply(&self, x: &[f64]) -> Result<DVector<f64>> {
        self.check_len(x.len(), self.dim)?;
        Ok(self.matrix.tr_mul(&DVector::from_column_slice(x)))
    }

    /// Map each row of an N × D matrix to reduced coordinates.
    pub fn apply_rows(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.check_len(points.ncols(), self.dim)?;
        Ok(points * &self.matrix)
    }

    /// Map reduced coordinates back onto the zero-sum hyperplane.
    ///
    /// For a vector `x` with `sum(x) = 0`, `invert(apply(x)) == x`. Any
    /// other vector comes back with its mean removed.
    pub fn invert(&self, y: &[f64]) -> Result<DVector<f64>> {
        self.check_len(y.len(), self.dim - 1)?;
        Ok(&self.matrix * DVector::from_column_slice(y))
    }

    /// Map each row of an N × (D-1) matrix back onto the hyperplane.
    pub fn invert_rows(&self, reduced: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.check_len(reduced.ncols(), self.dim - 1)?;
        Ok(reduced * self.matrix.transpose())
    }

    fn check_len(&self, actual: usize, expected: usize) -> Result<()> {
        if actual != expected {
            return Err(GeometryError::ShapeMismatch { expected, actual });
        }
        Ok(())
    }
}
