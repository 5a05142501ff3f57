//! Error type for precondition violations.
//!
//! Only caller mistakes are reported through [`Error`]. Broken internal
//! invariants (an uncovered reconnection, a cost regression after search)
//! are defects and panic instead.

use thiserror::Error as ThisError;

/// A malformed input detected before any search work starts.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// The anchored path holds fewer than two entries.
    #[error("path must hold at least 2 entries, got {len}")]
    PathTooShort { len: usize },

    /// The path does not start and end at the same anchor.
    #[error("path must start and end at the anchor, but starts at {first} and ends at {last}")]
    MissingAnchor { first: usize, last: usize },

    /// A point is visited more than once (the anchor counts as interior here).
    #[error("point {point} appears more than once in the path")]
    DuplicatePoint { point: usize },

    /// An identity lies outside the points covered by the oracle or by the
    /// induced problem.
    #[error("point {point} is outside the {size} points covered")]
    PointOutOfRange { point: usize, size: usize },

    /// The induced problem is too small to build candidate lists.
    #[error("induced problem needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// The tour handed to an engine does not match its candidate index.
    #[error("tour holds {actual} points but the candidate index covers {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The distance oracle returned a negative or non-finite cost.
    #[error("distance from {from} to {to} is {value}, expected a finite non-negative cost")]
    InvalidDistance { from: usize, to: usize, value: f64 },

    /// The two directions between a pair of points cost differently.
    #[error("distance from {from} to {to} is {forward} but {backward} in reverse, expected a symmetric cost")]
    AsymmetricDistance {
        from: usize,
        to: usize,
        forward: f64,
        backward: f64,
    },

    /// An option in [`OptimizerConfig`](crate::config::OptimizerConfig) is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
