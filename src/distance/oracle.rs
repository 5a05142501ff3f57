//! Pairwise distance lookup over global point identities.

use super::DistanceMatrix;

/// A source of travel costs between two points.
///
/// The local search only reads distances; it never mutates the oracle.
/// Costs must be finite, non-negative and symmetric; the optimiser checks
/// this for every pair it reads and rejects the input otherwise. The
/// triangle inequality only affects how well the candidate-radius pruning
/// works.
///
/// Any `Fn(usize, usize) -> f64` is an oracle, so ad-hoc cost functions can
/// be passed directly.
///
/// # Examples
///
/// ```
/// use u_tour_opt::distance::DistanceOracle;
///
/// let xs = [0.0_f64, 3.0, 10.0];
/// let line = |a: usize, b: usize| (xs[a] - xs[b]).abs();
/// assert_eq!(line.distance(0, 2), 10.0);
/// ```
pub trait DistanceOracle {
    /// Travel cost from `from` to `to`.
    fn distance(&self, from: usize, to: usize) -> f64;

    /// Number of points the oracle covers, when it is bounded.
    ///
    /// Identities `0..n` are valid. `None` means any identity is accepted.
    fn point_count(&self) -> Option<usize> {
        None
    }
}

impl DistanceOracle for DistanceMatrix {
    fn distance(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }

    fn point_count(&self) -> Option<usize> {
        Some(self.size())
    }
}

impl<F> DistanceOracle for F
where
    F: Fn(usize, usize) -> f64,
{
    fn distance(&self, from: usize, to: usize) -> f64 {
        self(from, to)
    }
}
