//! Distance lookup.
//!
//! Provides the [`DistanceOracle`] seam the optimizer reads global costs
//! through, and a dense matrix that implements it.

mod matrix;
mod oracle;

pub use matrix::DistanceMatrix;
pub use oracle::DistanceOracle;
