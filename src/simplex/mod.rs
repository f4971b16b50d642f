//! Simplex geometry for compositional data.
//!
//! - **transform**: isometric Helmert basis of the zero-sum hyperplane
//! - **tight**: tight enclosing simplex and barycentric coordinates

pub mod tight;
pub mod transform;

pub use tight::{
    barycentric_coordinates, tight_simplex, tight_simplex_with_config, TightSimplex,
    TightSimplexConfig, COMPOSITION_SUM_TOLERANCE,
};
pub use transform::SimplexTransform;
