//! Data structures for compositional tables.

mod composition_table;

pub use composition_table::CompositionTable;
