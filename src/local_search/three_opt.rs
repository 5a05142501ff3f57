//! Candidate-list 3-opt with don't-look bits.
//!
//! # Algorithm
//!
//! For a point `c1` with successor `s1`, the scan is nested: `c2` runs over
//! `c1`'s candidates nearer than `s1`, and for each of them `c3` runs over
//! the candidates of `s1`. Every reconnection adds `(c1, c2)`; which other
//! edges are cut and added depends on where `c3` sits relative to `c1` and
//! `c2`:
//!
//! | Case | `c3` | Edges added besides `(c1, c2)` |
//! |---|---|---|
//! | 2-opt (successor) | – | `(s1, s2)` |
//! | 2-opt (predecessor) | – | `(s1, c2)`, with `(c1, p2)` replacing `(c1, c2)` |
//! | Between | in `(c1, c2]` | `(c3, s1)`, `(p3, s2)` |
//! | Not between, successors | outside | `(s1, c3)`, `(s2, s3)` |
//! | Not between, predecessors | outside | `(s1, c3)`, `(p2, p3)` |
//! | Cyclic | outside | `(c3, s1)`, `(p2, s3)`, no inversion |
//!
//! The best 2-opt candidate seen so far is remembered and can be displaced
//! by later candidates; the first 3-opt reconnection that beats the current
//! best by more than epsilon ends the scan and is applied.
//!
//! As in [`two_opt_first`](super::two_opt_first), the run only ends once a
//! sweep that skipped no point finds nothing.
//!
//! # Complexity
//!
//! O(n·k²) per sweep. A move rewrites at most the two shorter of the three
//! arcs, so at most 2n/3 positions.
//!
//! # Reference
//!
//! Hoos, H.H. & Stützle, T. (2004). *Stochastic Local Search: Foundations
//! and Applications*, ch. 8. Morgan Kaufmann.

use rand::seq::SliceRandom;
use rand::Rng;

use super::circular::CircularTour;
use super::{CandidateIndex, DontLookBits, Move, MoveGain, SearchStats, ThreeOptMove, TwoOptMove};
use crate::config::OptimizerConfig;
use crate::error::Result;

/// Runs first-improvement 3-opt on `tour` until no candidate move helps.
///
/// `tour` is a permutation of the local identities of `candidates`, read as
/// a cycle. It is rewritten in place; the cycle may come back rotated or
/// mirrored.
///
/// # Panics
///
/// Panics if a selected reconnection turns out not to match the tour, which
/// indicates a defect in the case analysis rather than bad input.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_tour_opt::config::OptimizerConfig;
/// use u_tour_opt::local_search::{three_opt_first, CandidateIndex};
///
/// // An or-opt style detour: 0 → 3 → 1 → 2 → 4 on a line.
/// let xs = [0.0_f64, 2.0, 3.0, 1.0, 4.0];
/// let index = CandidateIndex::new(5, |a, b| (xs[a] - xs[b]).abs()).unwrap();
/// let mut tour = vec![0, 1, 2, 3, 4];
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let stats = three_opt_first(&mut tour, &index, &OptimizerConfig::default(), &mut rng).unwrap();
/// assert!(stats.moves >= 1);
/// ```
pub fn three_opt_first<R: Rng + ?Sized>(
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
            let Some(mv) = find_move(&circular, candidates, c1, config) else {
                dont_look.set(c1);
                continue;
            };
            log::trace!("3-opt: {mv:?}");
            mv.wake(&mut dont_look);
            match &mv {
                Move::TwoOpt(m) => circular.apply_two_opt(m),
                Move::ThreeOpt(m) => circular.apply_three_opt(m),
            }
            stats.record_move(mv.delta());
            improved = true;
        }
        if improved {
            continue;
        }
        if !skipped {
            break;
        }
        dont_look.reset();
    }

    tour.copy_from_slice(circular.order());
    log::debug!(
        "3-opt: {} points, {} moves in {} sweeps, improvement {:.6}",
        n,
        stats.moves,
        stats.sweeps,
        stats.improvement
    );
    Ok(stats)
}

/// Evaluates every reconnection around `c1` and returns the move to apply.
fn find_move(
    tour: &CircularTour,
    candidates: &CandidateIndex,
    c1: usize,
    config: &OptimizerConfig,
) -> Option<Move> {
    let d = |a: usize, b: usize| candidates.distance(a, b);
    let k = config.neighbors;
    let eps = config.move_epsilon;

    let s1 = tour.successor(c1);
    let radius = d(c1, s1);
    let mut best_value = 0.0;
    let mut best = None;

    for &c2 in candidates.nearest(c1, k) {
        let add1 = d(c1, c2);
        if add1 >= radius {
            break;
        }
        let s2 = tour.successor(c2);
        let p2 = tour.predecessor(c2);

        let via_successor = MoveGain::feasible_if(s2 != c1, add1 + d(s1, s2) - radius - d(c2, s2));
        let via_predecessor = MoveGain::feasible_if(
            p2 != c1 && p2 != s1,
            d(c1, p2) + d(s1, c2) - radius - d(p2, c2),
        );
        let (gain, h3, h4) = if via_successor <= via_predecessor {
            (via_successor, c2, s2)
        } else {
            (via_predecessor, p2, c2)
        };
        if gain.improves_on(best_value, eps) {
            if let Some(delta) = gain.delta() {
                best_value = delta;
                best = Some(Move::TwoOpt(TwoOptMove::new(c1, s1, h3, h4, delta)));
            }
        }

        for &c3 in candidates.nearest(s1, k) {
            if c3 == c1 {
                continue;
            }
            let add2 = d(s1, c3);
            let p3 = tour.predecessor(c3);
            let s3 = tour.successor(c3);

            if tour.between(c1, c2, c3) {
                let gain = MoveGain::Delta(add1 + add2 + d(p3, s2) - radius - d(c2, s2) - d(p3, c3));
                if gain.improves_on(best_value, eps) {
                    return gain
                        .delta()
                        .map(|delta| Move::ThreeOpt(ThreeOptMove::between(c1, s1, c2, s2, p3, c3, delta)));
                }
                continue;
            }

            let gain = MoveGain::feasible_if(
                c3 != c2,
                add1 + add2 + d(s2, s3) - radius - d(c2, s2) - d(c3, s3),
            );
            if gain.improves_on(best_value, eps) {
                return gain.delta().map(|delta| {
                    Move::ThreeOpt(ThreeOptMove::not_between_successor(c1, s1, c2, s2, c3, s3, delta))
                });
            }

            let distinct = c3 != c2 && p2 != c1;
            let gain = MoveGain::feasible_if(
                distinct,
                add1 + add2 + d(p2, p3) - radius - d(p2, c2) - d(p3, c3),
            );
            if gain.improves_on(best_value, eps) {
                return gain.delta().map(|delta| {
                    Move::ThreeOpt(ThreeOptMove::not_between_predecessor(c1, s1, p2, c2, p3, c3, delta))
                });
            }

            let gain = MoveGain::feasible_if(
                distinct,
                add1 + add2 + d(p2, s3) - radius - d(p2, c2) - d(c3, s3),
            );
            if gain.improves_on(best_value, eps) {
                return gain
                    .delta()
                    .map(|delta| Move::ThreeOpt(ThreeOptMove::cyclic(c1, s1, p2, c2, c3, s3, delta)));
            }
        }
    }

    best
}
