//! Tight enclosing simplex for a cloud of compositions.
//!
//! The fitted simplex is a translated and uniformly scaled copy of the unit
//! simplex: vertex `i` is `c + s (e_i - 1/D)` where `c` is the centroid of
//! the cloud. Its edges therefore run along the unit-simplex directions
//! `e_i - e_j` and its centroid coincides with the cloud's.
//!
//! The scale is found in the reduced coordinates of [`SimplexTransform`].
//! With the cloud centred and projected to `q_p`, and `r_i` the reduced
//! images of the unit vectors, point `p` has barycentric coordinate
//! `1/D + <r_i, q_p> / s` on vertex `i`. The smallest admissible scale is
//! therefore
//!
//! ```text
//! s_min = D * max_{i,p} ( -<r_i, q_p> )
//! ```
//!
//! and the fit uses `s_min * (1 + margin)` so that every point sits
//! strictly inside.

use super::transform::SimplexTransform;
use crate::error::{GeometryError, Result};
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize, Serializer};

/// Maximum deviation of a row sum from 1 for the row to count as a composition.
pub const COMPOSITION_SUM_TOLERANCE: f64 = 1e-6;

/// Configuration for [`tight_simplex_with_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TightSimplexConfig {
    /// Relative enlargement over the smallest enclosing scale.
    pub margin: f64,
    /// Slack allowed when checking barycentric coordinates.
    pub tolerance: f64,
    /// Reject fits whose vertices leave the non-negative orthant.
    pub confine_to_simplex: bool,
}

impl Default for TightSimplexConfig {
    fn default() -> Self {
        Self {
            margin: 1e-6,
            tolerance: 1e-8,
            confine_to_simplex: false,
        }
    }
}

/// A fitted simplex enclosing a cloud of compositions.
#[derive(Debug, Clone, Serialize)]
pub struct TightSimplex {
    /// Vertices, one composition per row (D × D).
    #[serde(serialize_with = "serialize_rows")]
    pub vertices: DMatrix<f64>,
    /// Centroid shared by the vertices and the input cloud.
    pub centroid: Vec<f64>,
    /// Scale relative to the unit simplex (1.0 reproduces it).
    pub scale: f64,
    /// Common edge length, `scale * sqrt(2)`.
    pub edge_length: f64,
    /// Number of points the simplex was fitted to.
    pub n_points: usize,
}

fn serialize_rows<S: Serializer>(m: &DMatrix<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let rows: Vec<Vec<f64>> = m.row_iter().map(|r| r.iter().copied().collect()).collect();
    rows.serialize(serializer)
}

impl TightSimplex {
    /// Number of parts (and vertices).
    pub fn dim(&self) -> usize {
        self.vertices.nrows()
    }

    /// Get reference to the vertex matrix.
    pub fn vertices(&self) -> &DMatrix<f64> {
        &self.vertices
    }

    /// Get a vertex as a vector.
    pub fn vertex(&self, i: usize) -> Vec<f64> {
        self.vertices.row(i).iter().cloned().collect()
    }

    /// Barycentric coordinates of `points` with respect to the vertices.
    pub fn barycentric(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        barycentric_coordinates(points, &self.vertices)
    }

    /// Whether every point lies inside the simplex, up to `tolerance`.
    pub fn contains(&self, points: &DMatrix<f64>, tolerance: f64) -> Result<bool> {
        let coords = self.barycentric(points)?;
        Ok(coords.iter().all(|&c| c >= -tolerance))
    }
}

/// Solve `coords · vertices = points` for the barycentric coordinates.
///
/// `vertices` is D × D with one vertex per row and `points` is N × D. For
/// vertices on the unit hyperplane each returned row sums to 1.
///
/// # Errors
/// - `ShapeMismatch` if the matrices do not line up
/// - `Domain` if the vertices are linearly dependent
pub fn barycentric_coordinates(points: &DMatrix<f64>, vertices: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n_parts = vertices.nrows();
    if vertices.ncols() != n_parts {
        return Err(GeometryError::ShapeMismatch {
            expected: n_parts,
            actual: vertices.ncols(),
        });
    }
    if points.ncols() != n_parts {
        return Err(GeometryError::ShapeMismatch {
            expected: n_parts,
            actual: points.ncols(),
        });
    }

    // coords · V = P  <=>  V^T · coords^T = P^T
    let solved = vertices
        .transpose()
        .lu()
        .solve(&points.transpose())
        .ok_or_else(|| {
            GeometryError::Domain("Simplex vertices are linearly dependent".to_string())
        })?;

    Ok(solved.transpose())
}

/// Fit a tight simplex with the default configuration.
///
/// # Example
/// ```
/// use compositional_geometry::simplex::tight_simplex;
/// use nalgebra::DMatrix;
///
/// let points = DMatrix::from_row_slice(3, 3, &[
///     0.4, 0.3, 0.3,
///     0.3, 0.4, 0.3,
///     0.3, 0.3, 0.4,
/// ]);
/// let fit = tight_simplex(&points).unwrap();
/// assert!(fit.contains(&points, 1e-12).unwrap());
/// ```
pub fn tight_simplex(points: &DMatrix<f64>) -> Result<TightSimplex> {
    tight_simplex_with_config(points, &TightSimplexConfig::default())
}

/// Fit a tight simplex to `points` (one composition per row).
///
/// # Errors
/// - `EmptyData` when there are no points
/// - `InvalidArgument` for fewer than two parts or a bad configuration
/// - `Domain` when a row is not a composition
/// - `FitInfeasible` when every point coincides with the centroid (this
///   includes a single-point cloud, whose smallest enclosing scale is 0),
///   or when the fitted simplex fails its containment or confinement checks
pub fn tight_simplex_with_config(
    points: &DMatrix<f64>,
    config: &TightSimplexConfig,
) -> Result<TightSimplex> {
    let (n_points, n_parts) = points.shape();

    if n_points == 0 {
        return Err(GeometryError::EmptyData(
            "Cannot fit a simplex to an empty point cloud".to_string(),
        ));
    }
    if n_parts < 2 {
        return Err(GeometryError::InvalidArgument(
            "Simplex fitting requires at least 2 parts".to_string(),
        ));
    }
    if !config.margin.is_finite() || config.margin < 0.0 {
        return Err(GeometryError::InvalidArgument(format!(
            "Margin must be non-negative, got {}",
            config.margin
        )));
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err(GeometryError::InvalidArgument(format!(
            "Tolerance must be positive, got {}",
            config.tolerance
        )));
    }
    check_compositions(points)?;

    let transform = SimplexTransform::for_dimension(n_parts)?;

    let centroid = DVector::from_fn(n_parts, |j, _| points.column(j).mean());
    let centred = DMatrix::from_fn(n_points, n_parts, |i, j| points[(i, j)] - centroid[j]);
    let reduced = transform.apply_rows(&centred)?;
    let reference = transform.vertices();

    // projections[(p, i)] = <q_p, r_i>
    let projections = &reduced * reference.transpose();
    let deepest = projections.iter().fold(0.0_f64, |acc, &v| acc.max(-v));
    let required = n_parts as f64 * deepest;
    trace!("Minimum enclosing scale {} for {} points", required, n_points);

    // Only a cloud with no spread at all (every point on the centroid) has
    // no enclosing scale; tiny but real spreads still fit.
    let floor = f64::EPSILON * centroid.amax();
    if !required.is_finite() || required <= floor {
        return Err(GeometryError::FitInfeasible(format!(
            "Point cloud is degenerate (spread {:.3e})",
            required
        )));
    }

    let scale = required * (1.0 + config.margin);
    let offsets = transform.invert_rows(&(reference * scale))?;
    let vertices = DMatrix::from_fn(n_parts, n_parts, |i, j| centroid[j] + offsets[(i, j)]);

    if config.confine_to_simplex {
        if let Some(min) = vertices.iter().copied().reduce(f64::min) {
            if min < -config.tolerance {
                return Err(GeometryError::FitInfeasible(format!(
                    "Fitted vertices leave the unit simplex (minimum part {:.3e})",
                    min
                )));
            }
        }
    }

    let share = 1.0 / n_parts as f64;
    let min_coord = projections
        .iter()
        .fold(f64::INFINITY, |acc, &v| acc.min(share + v / scale));
    if min_coord < -config.tolerance {
        return Err(GeometryError::FitInfeasible(format!(
            "Fitted simplex excludes input points (barycentric coordinate {:.3e})",
            min_coord
        )));
    }

    debug!(
        "Fitted simplex to {} points in {} parts: scale {:.6}, min barycentric {:.3e}",
        n_points, n_parts, scale, min_coord
    );

    Ok(TightSimplex {
        vertices,
        centroid: centroid.iter().copied().collect(),
        scale,
        edge_length: scale * std::f64::consts::SQRT_2,
        n_points,
    })
}

/// Every row must be finite, non-negative and sum to 1.
fn check_compositions(points: &DMatrix<f64>) -> Result<()> {
    for (i, row) in points.row_iter().enumerate() {
        if let Some(v) = row.iter().find(|v| !v.is_finite()) {
            return Err(GeometryError::InvalidArgument(format!(
                "Row {} has non-finite part {}",
                i, v
            )));
        }
        if let Some(v) = row.iter().find(|v| **v < 0.0) {
            return Err(GeometryError::Domain(format!(
                "Row {} has negative part {}",
                i, v
            )));
        }
        let total = row.sum();
        if (total - 1.0).abs() > COMPOSITION_SUM_TOLERANCE {
            return Err(GeometryError::Domain(format!(
                "Row {} sums to {}, not 1; close the compositions first",
                i, total
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn near_centre() -> DMatrix<f64> {
        DMatrix::from_row_slice(
            5,
            4,
            &[
                0.26, 0.24, 0.27, 0.23, //
                0.22, 0.28, 0.25, 0.25, //
                0.25, 0.25, 0.21, 0.29, //
                0.27, 0.23, 0.26, 0.24, //
                0.24, 0.26, 0.24, 0.26,
            ],
        )
    }

    #[test]
    fn test_vertices_on_unit_hyperplane() {
        let fit = tight_simplex(&near_centre()).unwrap();
        assert_eq!(fit.dim(), 4);
        for row in fit.vertices().row_iter() {
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_centroid_matches_cloud() {
        let points = near_centre();
        let fit = tight_simplex(&points).unwrap();
        for j in 0..4 {
            let vertex_mean = fit.vertices().column(j).mean();
            assert_relative_eq!(vertex_mean, points.column(j).mean(), epsilon = 1e-12);
            assert_relative_eq!(fit.centroid[j], points.column(j).mean(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_edges_follow_unit_simplex() {
        let fit = tight_simplex(&near_centre()).unwrap();
        let v = fit.vertices();
        let l = (v.row(0) - v.row(1)).norm();
        assert_relative_eq!(l, fit.edge_length, epsilon = 1e-12);

        for i in 0..4 {
            for j in (i + 1)..4 {
                let mut direction = vec![0.0; 4];
                direction[i] = 1.0;
                direction[j] = -1.0;
                let expected = DVector::from_vec(direction) * (l / 2.0_f64.sqrt());
                let actual = (v.row(i) - v.row(j)).transpose();
                assert_relative_eq!(actual, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_points_strictly_inside() {
        let points = near_centre();
        let fit = tight_simplex(&points).unwrap();
        let coords = fit.barycentric(&points).unwrap();

        assert_eq!(coords.shape(), (5, 4));
        for row in coords.row_iter() {
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-10);
        }
        assert!(coords.iter().all(|&c| c > 0.0));
        assert!(fit.contains(&points, 0.0).unwrap());
    }

    #[test]
    fn test_fit_is_tight() {
        // Without a margin some point sits on a facet
        let points = near_centre();
        let config = TightSimplexConfig {
            margin: 0.0,
            ..TightSimplexConfig::default()
        };
        let fit = tight_simplex_with_config(&points, &config).unwrap();
        let coords = fit.barycentric(&points).unwrap();
        assert_relative_eq!(coords.min(), 0.0, epsilon = 1e-10);

        // The smallest part is 0.21 against a centroid of 0.246
        assert_relative_eq!(fit.scale, 4.0 * (0.246 - 0.21), epsilon = 1e-10);
    }

    #[test]
    fn test_margin_enlarges() {
        let points = near_centre();
        let tight = tight_simplex_with_config(
            &points,
            &TightSimplexConfig {
                margin: 0.0,
                ..TightSimplexConfig::default()
            },
        )
        .unwrap();
        let loose = tight_simplex_with_config(
            &points,
            &TightSimplexConfig {
                margin: 0.1,
                ..TightSimplexConfig::default()
            },
        )
        .unwrap();
        assert_relative_eq!(loose.scale, tight.scale * 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_unit_simplex_vertices() {
        // The unit vectors are enclosed by the unit simplex itself
        let points = DMatrix::identity(3, 3);
        let config = TightSimplexConfig {
            margin: 0.0,
            ..TightSimplexConfig::default()
        };
        let fit = tight_simplex_with_config(&points, &config).unwrap();
        assert_relative_eq!(fit.scale, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.vertices().clone(), DMatrix::identity(3, 3), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_cloud() {
        let points = DMatrix::from_row_slice(2, 3, &[0.2, 0.3, 0.5, 0.2, 0.3, 0.5]);
        assert!(matches!(
            tight_simplex(&points),
            Err(GeometryError::FitInfeasible(_))
        ));
    }

    #[test]
    fn test_single_point_cloud() {
        let points = DMatrix::from_row_slice(1, 3, &[0.2, 0.3, 0.5]);
        assert!(matches!(
            tight_simplex(&points),
            Err(GeometryError::FitInfeasible(_))
        ));
    }

    #[test]
    fn test_small_spread_cloud() {
        let points = DMatrix::from_row_slice(
            2,
            3,
            &[
                0.3, 0.3, 0.4, //
                0.3 + 1e-9, 0.3 - 1e-9, 0.4,
            ],
        );
        let fit = tight_simplex(&points).unwrap();
        let expected = 1.5e-9 * (1.0 + TightSimplexConfig::default().margin);
        assert_relative_eq!(fit.scale, expected, max_relative = 1e-4);
        assert_eq!(fit.n_points, 2);
        for row in fit.vertices().row_iter() {
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(fit.centroid[2], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_confinement() {
        // Most mass near the first vertex drags the centroid off-centre
        let points = DMatrix::from_row_slice(
            5,
            3,
            &[
                0.9, 0.05, 0.05, //
                0.9, 0.05, 0.05, //
                0.9, 0.05, 0.05, //
                0.05, 0.9, 0.05, //
                0.05, 0.05, 0.9,
            ],
        );
        let free = tight_simplex(&points).unwrap();
        assert!(free.vertices().iter().any(|&v| v < 0.0));
        assert!(free.contains(&points, 1e-12).unwrap());

        let config = TightSimplexConfig {
            confine_to_simplex: true,
            ..TightSimplexConfig::default()
        };
        assert!(matches!(
            tight_simplex_with_config(&points, &config),
            Err(GeometryError::FitInfeasible(_))
        ));
    }

    #[test]
    fn test_rejects_non_compositions() {
        let unclosed = DMatrix::from_row_slice(2, 2, &[0.5, 0.6, 0.3, 0.7]);
        assert!(matches!(tight_simplex(&unclosed), Err(GeometryError::Domain(_))));

        let negative = DMatrix::from_row_slice(2, 2, &[1.2, -0.2, 0.3, 0.7]);
        assert!(matches!(tight_simplex(&negative), Err(GeometryError::Domain(_))));

        let empty = DMatrix::<f64>::zeros(0, 3);
        assert!(matches!(tight_simplex(&empty), Err(GeometryError::EmptyData(_))));

        let single = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        assert!(matches!(tight_simplex(&single), Err(GeometryError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = TightSimplexConfig {
            margin: -0.5,
            ..TightSimplexConfig::default()
        };
        assert!(matches!(
            tight_simplex_with_config(&near_centre(), &config),
            Err(GeometryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_barycentric_singular() {
        let vertices = DMatrix::from_row_slice(2, 2, &[0.5, 0.5, 0.5, 0.5]);
        let points = DMatrix::from_row_slice(1, 2, &[0.5, 0.5]);
        assert!(matches!(
            barycentric_coordinates(&points, &vertices),
            Err(GeometryError::Domain(_))
        ));

        let wide = DMatrix::from_row_slice(1, 3, &[0.2, 0.3, 0.5]);
        assert!(matches!(
            barycentric_coordinates(&wide, &DMatrix::identity(2, 2)),
            Err(GeometryError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_serializes_vertex_rows() {
        let fit = tight_simplex(&near_centre()).unwrap();
        let json = serde_json::to_value(&fit).unwrap();
        assert_eq!(json["vertices"].as_array().unwrap().len(), 4);
        assert_eq!(json["vertices"][0].as_array().unwrap().len(), 4);
        assert_eq!(json["n_points"], 5);
    }
}
