//! Compositional Data Geometry Library
//!
//! This library provides the geometry needed to work with compositional
//! data (non-negative parts summing to one) using ordinary Euclidean tools.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Labelled composition tables with TSV input/output
//! - **geometry**: Point-cloud helpers (center of mass, distance, sphere points, crystal expansion)
//! - **normalize**: Log-ratio transforms (ALR, CLR, their inverses, Aitchison distance)
//! - **zero**: Zero handling (multiplicative replacement)
//! - **simplex**: Isometric simplex basis and tight simplex fitting
//! - **config**: Serializable settings for the above
//!
//! # Example
//!
//! ```
//! use compositional_geometry::prelude::*;
//! use nalgebra::DMatrix;
//!
//! // Remove a zero, then move to CLR coordinates
//! let replaced = multiplicative_replacement(&[0.2, 0.0, 0.3, 0.5], None).unwrap();
//! let coords = clr(replaced.as_slice()).unwrap();
//! assert!(coords.sum().abs() < 1e-12);
//!
//! // Fit a simplex around a small cloud
//! let cloud = DMatrix::from_row_slice(3, 3, &[
//!     0.5, 0.3, 0.2,
//!     0.2, 0.5, 0.3,
//!     0.3, 0.2, 0.5,
//! ]);
//! let fit = tight_simplex(&cloud).unwrap();
//! assert!(fit.contains(&cloud, 1e-12).unwrap());
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod normalize;
pub mod simplex;
pub mod zero;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::GeometryConfig;
    pub use crate::data::CompositionTable;
    pub use crate::error::{GeometryError, Result};
    pub use crate::geometry::{
        center_of_mass, center_of_mass_one_array, center_of_mass_two_array, distance,
        distance_flat, distance_rows, sphere_points, MassInput,
        // Crystal expansion
        coords_to_crystal, coords_to_symmetry, fractionalize, orthogonalize,
    };
    pub use crate::normalize::{
        aitchison_distance, aitchison_distance_matrix, alr, alr_inv, alr_rows, closure, clr,
        clr_inv, clr_rows,
    };
    pub use crate::simplex::{
        barycentric_coordinates, tight_simplex, tight_simplex_with_config, SimplexTransform,
        TightSimplex, TightSimplexConfig,
    };
    pub use crate::zero::{
        multiplicative_replacement, multiplicative_replacement_rows,
        multiplicative_replacement_with_config, ReplacementConfig,
    };
}
