//! Candidate-list 2-opt with don't-look bits.
//!
//! # Algorithm
//!
//! Points are visited in a random order fixed for the whole run. For a
//! point `c1` with successor `s1`, each candidate `c2` nearer to `c1` than
//! `s1` is tried as the new neighbour of `c1`:
//!
//! ```text
//! delta = d(c1, c2) + d(s1, s2) - d(c1, s1) - d(c2, s2)
//! ```
//!
//! and symmetrically with predecessors. The first move with
//! `delta < -epsilon` is applied immediately by reversing the shorter side
//! of the cycle. The run stops after a sweep that evaluates every point and
//! accepts nothing; a fruitless sweep that skipped points clears all
//! don't-look bits and sweeps again.
//!
//! # Complexity
//!
//! O(n·k) per sweep, O(n) per move (at most n/2 swaps).
//!
//! # Reference
//!
//! Hoos, H.H. & Stützle, T. (2004). *Stochastic Local Search: Foundations
//! and Applications*, ch. 8. Morgan Kaufmann.

use rand::seq::SliceRandom;
use rand::Rng;

use super::circular::CircularTour;
use super::{CandidateIndex, DontLookBits, Move, MoveGain, SearchStats, TwoOptMove};
use crate::config::OptimizerConfig;
use crate::error::Result;

/// Runs first-improvement 2-opt on `tour` until no candidate move helps.
///
/// `tour` is a permutation of the local identities of `candidates`, read as
/// a cycle. It is rewritten in place; the cycle may come back rotated.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_tour_opt::config::OptimizerConfig;
/// use u_tour_opt::local_search::{two_opt_first, CandidateIndex};
///
/// let xs = [0.0_f64, 6.0, 3.0, 10.0];
/// let index = CandidateIndex::new(4, |a, b| (xs[a] - xs[b]).abs()).unwrap();
/// let mut tour = vec![0, 1, 2, 3]; // 0 → 6 → 3 → 10 → 0, cost 26
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let stats = two_opt_first(&mut tour, &index, &OptimizerConfig::default(), &mut rng).unwrap();
/// assert_eq!(stats.moves, 1);
/// assert!((stats.improvement - 6.0).abs() < 1e-9);
/// ```
pub fn two_opt_first<R: Rng + ?Sized>(
    tour: &mut [usize],
    candidates: &CandidateIndex,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Result<SearchStats> {
    config.validate()?;
    let mut circular = CircularTour::from_order(tour, candidates.len())?;
    let n = circular.len();
    let mut dont_look = DontLookBits::new(n);
    let mut scan_order: Vec<usize> = (0..n).collect();
    scan_order.shuffle(rng);

    let mut stats = SearchStats::default();
    loop {
        stats.sweeps += 1;
        let mut improved = false;
        let mut skipped = false;
        for &c1 in &scan_order {
            if dont_look.is_set(c1) {
                skipped = true;
                continue;
            }
            match find_move(&circular, candidates, c1, config) {
                Some(mv) => {
                    log::trace!("2-opt: {mv:?}");
                    Move::TwoOpt(mv).wake(&mut dont_look);
                    circular.apply_two_opt(&mv);
                    stats.record_move(mv.delta);
                    improved = true;
                }
                None => dont_look.set(c1),
            }
        }
        if improved {
            continue;
        }
        if !skipped {
            break;
        }
        // Moves elsewhere can open exchanges for points skipped since.
        dont_look.reset();
    }

    tour.copy_from_slice(circular.order());
    log::debug!(
        "2-opt: {} points, {} moves in {} sweeps, improvement {:.6}",
        n,
        stats.moves,
        stats.sweeps,
        stats.improvement
    );
    Ok(stats)
}

/// Scans `c1`'s candidates, successor side first, and returns the first
/// improving exchange.
fn find_move(
    tour: &CircularTour,
    candidates: &CandidateIndex,
    c1: usize,
    config: &OptimizerConfig,
) -> Option<TwoOptMove> {
    let d = |a: usize, b: usize| candidates.distance(a, b);
    let near = candidates.nearest(c1, config.neighbors);
    let eps = config.move_epsilon;

    let s1 = tour.successor(c1);
    let radius = d(c1, s1);
    for &c2 in near {
        let add = d(c1, c2);
        if add >= radius {
            break;
        }
        let s2 = tour.successor(c2);
        let gain = MoveGain::feasible_if(s2 != c1, add + d(s1, s2) - radius - d(c2, s2));
        if gain.improves_on(0.0, eps) {
            return gain.delta().map(|delta| TwoOptMove::new(c1, s1, c2, s2, delta));
        }
    }

    let p1 = tour.predecessor(c1);
    let radius = d(p1, c1);
    for &c2 in near {
        let add = d(c1, c2);
        if add >= radius {
            break;
        }
        let p2 = tour.predecessor(c2);
        if p2 == c1 || p1 == c2 {
            continue;
        }
        let gain = MoveGain::Delta(add + d(p1, p2) - radius - d(p2, c2));
        if gain.improves_on(0.0, eps) {
            return gain.delta().map(|delta| TwoOptMove::new(p1, c1, p2, c2, delta));
        }
    }

    None
}
