//! Symmetry and lattice expansion of atomic coordinates.
//!
//! Coordinates are Cartesian, one atom per row (N × 3). The
//! fractionalization matrix `fmx` maps a Cartesian column vector into
//! fractional cell coordinates; `omx` maps it back.

use crate::error::{GeometryError, Result};
use nalgebra::{DMatrix, Matrix3, Matrix4, Vector3, Vector4};

fn check_xyz(coords: &DMatrix<f64>) -> Result<()> {
    if coords.ncols() != 3 {
        return Err(GeometryError::ShapeMismatch {
            expected: 3,
            actual: coords.ncols(),
        });
    }
    Ok(())
}

fn map_rows(coords: &DMatrix<f64>, f: impl Fn(Vector3<f64>) -> Vector3<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(coords.nrows(), 3);
    for i in 0..coords.nrows() {
        let v = f(Vector3::new(coords[(i, 0)], coords[(i, 1)], coords[(i, 2)]));
        out[(i, 0)] = v.x;
        out[(i, 1)] = v.y;
        out[(i, 2)] = v.z;
    }
    out
}

/// Convert Cartesian coordinates to fractional cell coordinates.
pub fn fractionalize(coords: &DMatrix<f64>, fmx: &Matrix3<f64>) -> Result<DMatrix<f64>> {
    check_xyz(coords)?;
    Ok(map_rows(coords, |v| fmx * v))
}

/// Convert fractional cell coordinates to Cartesian coordinates.
pub fn orthogonalize(frac: &DMatrix<f64>, omx: &Matrix3<f64>) -> Result<DMatrix<f64>> {
    check_xyz(frac)?;
    Ok(map_rows(frac, |v| omx * v))
}

/// Apply crystallographic symmetry operators to a set of coordinates.
///
/// Each operator is a homogeneous 4 × 4 matrix acting on fractional
/// column vectors. The first returned block is the input itself, followed
/// by one block per operator.
pub fn coords_to_symmetry(
    coords: &DMatrix<f64>,
    fmx: &Matrix3<f64>,
    omx: &Matrix3<f64>,
    operators: &[Matrix4<f64>],
) -> Result<Vec<DMatrix<f64>>> {
    let frac = fractionalize(coords, fmx)?;

    let mut copies = Vec::with_capacity(operators.len() + 1);
    copies.push(coords.clone());
    for op in operators {
        let moved = map_rows(&frac, |v| {
            let h = op * Vector4::new(v.x, v.y, v.z, 1.0);
            Vector3::new(h.x, h.y, h.z)
        });
        copies.push(orthogonalize(&moved, omx)?);
    }
    Ok(copies)
}

/// Tile a unit cell's contents over neighbouring lattice cells.
///
/// Every integer translation in `[-n, n]^3` is applied, giving
/// `(2n + 1)^3` blocks. The zero translation comes first.
pub fn coords_to_crystal(
    coords: &DMatrix<f64>,
    fmx: &Matrix3<f64>,
    omx: &Matrix3<f64>,
    n: usize,
) -> Result<Vec<DMatrix<f64>>> {
    let frac = fractionalize(coords, fmx)?;
    let n = n as i64;

    let mut shifts = vec![Vector3::zeros()];
    for i in -n..=n {
        for j in -n..=n {
            for k in -n..=n {
                if (i, j, k) != (0, 0, 0) {
                    shifts.push(Vector3::new(i as f64, j as f64, k as f64));
                }
            }
        }
    }

    shifts
        .into_iter()
        .map(|shift| orthogonalize(&map_rows(&frac, |v| v + shift), omx))
        .collect()
}
