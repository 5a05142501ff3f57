//! Domain model types.
//!
//! The optimizer works on depot-anchored open paths: one vehicle route,
//! beginning and ending at the same anchor point.

mod tour;

pub use tour::{path_cost, validate_path, Tour};
