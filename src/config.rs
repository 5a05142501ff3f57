//! Optimizer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default candidate-list length consulted per point.
pub const DEFAULT_NEIGHBORS: usize = 20;

/// Default minimum cost decrease for a move to be accepted.
pub const DEFAULT_MOVE_EPSILON: f64 = 1e-4;

/// Default slack allowed when checking that an optimized segment is not worse.
pub const DEFAULT_REGRESSION_TOLERANCE: f64 = 1e-9;

/// Neighbourhood searched by the segment optimizer.
///
/// Serialized as `"two-opt"` / `"three-opt"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizeMethod {
    /// Segment reversals only.
    TwoOpt,
    /// 2-opt plus the four 3-opt reconnections.
    #[default]
    ThreeOpt,
}

/// Options recognized by the local search engines and the segment optimizer.
///
/// Missing fields fall back to their defaults when deserializing.
///
/// # Examples
///
/// ```
/// use u_tour_opt::config::{OptimizeMethod, OptimizerConfig};
///
/// let config = OptimizerConfig::default()
///     .with_method(OptimizeMethod::TwoOpt)
///     .with_neighbors(8);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.move_epsilon, 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Engine to run.
    pub method: OptimizeMethod,
    /// Number of nearest neighbours scanned per point (`k`).
    pub neighbors: usize,
    /// A move must lower the cost by more than this to be accepted.
    pub move_epsilon: f64,
    /// Allowed cost increase between input and output before the run is
    /// treated as a defect.
    pub regression_tolerance: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            method: OptimizeMethod::default(),
            neighbors: DEFAULT_NEIGHBORS,
            move_epsilon: DEFAULT_MOVE_EPSILON,
            regression_tolerance: DEFAULT_REGRESSION_TOLERANCE,
        }
    }
}

impl OptimizerConfig {
    pub fn with_method(mut self, method: OptimizeMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn with_move_epsilon(mut self, epsilon: f64) -> Self {
        self.move_epsilon = epsilon;
        self
    }

    pub fn with_regression_tolerance(mut self, tolerance: f64) -> Self {
        self.regression_tolerance = tolerance;
        self
    }

    /// Checks that every option is usable.
    ///
    /// `move_epsilon` must be strictly positive: the search has no iteration
    /// cap and relies on every accepted move lowering the cost by a fixed
    /// amount.
    pub fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(Error::invalid_config("neighbors must be at least 1"));
        }
        if !self.move_epsilon.is_finite() || self.move_epsilon <= 0.0 {
            return Err(Error::invalid_config(format!(
                "move_epsilon must be finite and positive, got {}",
                self.move_epsilon
            )));
        }
        if !self.regression_tolerance.is_finite() || self.regression_tolerance < 0.0 {
            return Err(Error::invalid_config(format!(
                "regression_tolerance must be finite and non-negative, got {}",
                self.regression_tolerance
            )));
        }
        Ok(())
    }
}
