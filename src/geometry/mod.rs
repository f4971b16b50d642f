//! Generic point-cloud geometry.
//!
//! - **center_of_mass**: weighted centroids (combined or split weights)
//! - **distance**: Euclidean distances, single and batched
//! - **sphere**: evenly spread points on the unit sphere
//! - **crystal**: symmetry and lattice expansion of coordinates

pub mod center_of_mass;
pub mod crystal;
pub mod distance;
pub mod sphere;

pub use center_of_mass::{
    center_of_mass, center_of_mass_one_array, center_of_mass_two_array, MassInput,
};
pub use crystal::{coords_to_crystal, coords_to_symmetry, fractionalize, orthogonalize};
pub use distance::{distance, distance_flat, distance_rows};
pub use sphere::sphere_points;
