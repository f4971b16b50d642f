//! Zero handling for compositions.
//!
//! - **replacement**: multiplicative replacement (ratio preserving)

pub mod replacement;

pub use replacement::{
    multiplicative_replacement, multiplicative_replacement_rows,
    multiplicative_replacement_with_config, ReplacementConfig, DEFAULT_REPLACEMENT_SCALE,
};
