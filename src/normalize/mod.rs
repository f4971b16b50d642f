//! Log-ratio transforms for compositional data.
//!
//! - **closure**: rescale parts onto the unit simplex
//! - **ALR**: additive log-ratio against a reference part, and its inverse
//! - **CLR**: centered log-ratio, and its inverse
//! - **Aitchison distance**: Euclidean distance between CLR coordinates
//!
//! All transforms except closure require strictly positive parts; route
//! compositions with zeros through [`crate::zero`] first.

pub mod aitchison;
pub mod alr;
pub mod closure;
pub mod clr;

pub use aitchison::{aitchison_distance, aitchison_distance_matrix};
pub use alr::{alr, alr_inv, alr_rows};
pub use closure::closure;
pub use clr::{clr, clr_inv, clr_rows};
