//! Aitchison distance: the Euclidean metric of CLR coordinates.

use super::clr::{clr, clr_rows};
use crate::error::{GeometryError, Result};
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Aitchison distance between two compositions.
///
/// # Formula
/// d_A(x, y) = || clr(x) - clr(y) ||
pub fn aitchison_distance(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(GeometryError::ShapeMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    Ok((clr(x)? - clr(y)?).norm())
}

/// Pairwise Aitchison distances between the rows of an N × D matrix.
pub fn aitchison_distance_matrix(data: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let coords = clr_rows(data)?;
    let n = coords.nrows();

    let upper: Vec<(usize, usize, f64)> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let coords = &coords;
            ((i + 1)..n).map(move |j| (i, j, (coords.row(i) - coords.row(j)).norm()))
        })
        .collect();

    let mut dist = DMatrix::zeros(n, n);
    for (i, j, d) in upper {
        dist[(i, j)] = d;
        dist[(j, i)] = d;
    }
    Ok(dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matches_clr_euclidean() {
        let x = [0.1, 0.2, 0.3, 0.4];
        let y = [0.4, 0.3, 0.2, 0.1];
        let expected = (clr(&x).unwrap() - clr(&y).unwrap()).norm();
        assert_relative_eq!(aitchison_distance(&x, &y).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_invariant_and_symmetric() {
        let x = [1.0, 2.0, 3.0];
        let scaled = [10.0, 20.0, 30.0];
        assert_relative_eq!(aitchison_distance(&x, &scaled).unwrap(), 0.0, epsilon = 1e-12);

        let y = [3.0, 1.0, 1.0];
        assert_eq!(
            aitchison_distance(&x, &y).unwrap(),
            aitchison_distance(&y, &x).unwrap()
        );
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(matches!(
            aitchison_distance(&[0.5, 0.5], &[0.2, 0.3, 0.5]),
            Err(GeometryError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_distance_matrix() {
        let data = DMatrix::from_row_slice(3, 3, &[0.2, 0.3, 0.5, 0.5, 0.3, 0.2, 0.1, 0.1, 0.8]);
        let dist = aitchison_distance_matrix(&data).unwrap();
        assert_eq!(dist.shape(), (3, 3));
        for i in 0..3 {
            assert_eq!(dist[(i, i)], 0.0);
        }
        assert_relative_eq!(
            dist[(0, 2)],
            aitchison_distance(&[0.2, 0.3, 0.5], &[0.1, 0.1, 0.8]).unwrap(),
            epsilon = 1e-12
        );
        assert_eq!(dist[(1, 0)], dist[(0, 1)]);
    }
}
