//! Anchored path optimisation on top of the cycle engines.
//!
//! A route `[anchor, c1, …, ck, anchor]` is a cycle with one edge cut at the
//! anchor. The optimiser relabels path position `i` as local identity `i`,
//! improves the cycle over those identities and cuts it open again at the
//! anchor, so the returned path always starts and ends where the input did.

use rand::Rng;

use super::{three_opt_first, two_opt_first, CandidateIndex, SearchStats};
use crate::config::{OptimizeMethod, OptimizerConfig};
use crate::distance::DistanceOracle;
use crate::error::{Error, Result};
use crate::models::{path_cost, validate_path, Tour};

/// Result of optimising one anchored path.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    /// The improved path, anchored at both ends like the input.
    pub path: Vec<usize>,
    /// Cost of the input path under the oracle.
    pub original_cost: f64,
    /// Cost of [`path`](Self::path) under the oracle.
    pub optimized_cost: f64,
    /// Counters of the engine run; all zero when the path was too short to
    /// search.
    pub stats: SearchStats,
}

impl SegmentOutcome {
    /// Cost saved by the run. Never below `-regression_tolerance`.
    pub fn improvement(&self) -> f64 {
        self.original_cost - self.optimized_cost
    }
}

/// Improves the visiting order of an anchored path with the configured
/// engine.
///
/// `path` holds global identities and must start and end at the same anchor
/// with no other repeats. The returned path is a permutation of the input
/// with the anchor at both ends and a cost no higher than the input's.
/// Paths with at most one interior point are returned as they are.
///
/// # Errors
///
/// Returns an error before doing any work if the path is malformed, the
/// configuration is out of range, a point lies outside
/// [`point_count`](DistanceOracle::point_count), or the oracle yields a
/// negative, non-finite or asymmetric cost between two points of the path.
/// Distance errors name global identities.
///
/// # Panics
///
/// Panics if the optimised path costs more than the input beyond
/// `regression_tolerance`, which indicates a defect in the engines. An
/// oracle without a `point_count` may itself panic on identities it does
/// not know.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_tour_opt::config::OptimizerConfig;
/// use u_tour_opt::distance::DistanceMatrix;
/// use u_tour_opt::local_search::optimize_segment;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 0.0), (6.0, 0.0), (10.0, 0.0)]);
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let out = optimize_segment(&[0, 2, 1, 3, 0], &dm, &OptimizerConfig::default(), &mut rng).unwrap();
/// assert_eq!(out.path.first(), Some(&0));
/// assert_eq!(out.path.last(), Some(&0));
/// assert!((out.original_cost - 26.0).abs() < 1e-9);
/// assert!((out.optimized_cost - 20.0).abs() < 1e-9);
/// ```
pub fn optimize_segment<D, R>(
    path: &[usize],
    oracle: &D,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Result<SegmentOutcome>
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    validate_path(path)?;
    validate_legs(path, oracle)?;

    let original_cost = path_cost(path, oracle);
    if path.len() <= 3 {
        return Ok(SegmentOutcome {
            path: path.to_vec(),
            original_cost,
            optimized_cost: original_cost,
            stats: SearchStats::default(),
        });
    }

    let candidates = CandidateIndex::from_path(path, oracle)?;
    let mut local: Vec<usize> = (0..candidates.len()).collect();
    let stats = match config.method {
        OptimizeMethod::TwoOpt => two_opt_first(&mut local, &candidates, config, rng)?,
        OptimizeMethod::ThreeOpt => three_opt_first(&mut local, &candidates, config, rng)?,
    };

    let optimized = reopen_at_anchor(&local, path);
    let optimized_cost = path_cost(&optimized, oracle);
    ensure_not_worse(original_cost, optimized_cost, config.regression_tolerance);

    log::debug!(
        "segment of {} points ({:?}): cost {:.6} -> {:.6}, {} moves",
        candidates.len(),
        config.method,
        original_cost,
        optimized_cost,
        stats.moves
    );

    Ok(SegmentOutcome {
        path: optimized,
        original_cost,
        optimized_cost,
        stats,
    })
}

/// Optimises `tour` in place.
///
/// The tour is replaced only once the optimised path has passed the
/// regression check; on error it is left untouched.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_tour_opt::config::{OptimizeMethod, OptimizerConfig};
/// use u_tour_opt::distance::DistanceMatrix;
/// use u_tour_opt::local_search::optimize_tour;
/// use u_tour_opt::models::Tour;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 0.0), (6.0, 0.0), (10.0, 0.0)]);
/// let mut tour = Tour::from_interior(0, &[2, 1, 3]).unwrap();
/// let config = OptimizerConfig::default().with_method(OptimizeMethod::TwoOpt);
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let out = optimize_tour(&mut tour, &dm, &config, &mut rng).unwrap();
/// assert!((tour.cost(&dm) - 20.0).abs() < 1e-9);
/// assert!((out.improvement() - 6.0).abs() < 1e-9);
/// ```
pub fn optimize_tour<D, R>(
    tour: &mut Tour,
    oracle: &D,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Result<SegmentOutcome>
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let outcome = optimize_segment(tour.points(), oracle, config, rng)?;
    tour.replace_points(outcome.path.clone());
    Ok(outcome)
}

/// Checks every point against the oracle's range and every leg of the path
/// for a usable cost.
fn validate_legs<D: DistanceOracle + ?Sized>(path: &[usize], oracle: &D) -> Result<()> {
    if let Some(size) = oracle.point_count() {
        if let Some(&point) = path.iter().find(|&&p| p >= size) {
            return Err(Error::PointOutOfRange { point, size });
        }
    }
    for leg in path.windows(2) {
        let (from, to) = (leg[0], leg[1]);
        let value = oracle.distance(from, to);
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidDistance { from, to, value });
        }
    }
    Ok(())
}

/// Rotates the local cycle so identity `0` (the anchor) comes first, maps
/// it back to global identities and closes it with the anchor.
fn reopen_at_anchor(local: &[usize], path: &[usize]) -> Vec<usize> {
    let Some(start) = local.iter().position(|&p| p == 0) else {
        log::error!("anchor missing from optimised cycle {local:?}");
        panic!("anchor missing from optimised cycle");
    };
    let mut reopened = Vec::with_capacity(local.len() + 1);
    reopened.extend(local[start..].iter().chain(&local[..start]).map(|&p| path[p]));
    reopened.push(path[0]);
    reopened
}

fn ensure_not_worse(original: f64, optimized: f64, tolerance: f64) {
    if optimized > original + tolerance {
        log::error!(
            "local search regressed: cost {original} -> {optimized} (tolerance {tolerance})"
        );
        panic!("local search regressed: cost {original} -> {optimized}");
    }
}
