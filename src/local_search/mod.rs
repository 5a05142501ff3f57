//! Candidate-list local search for anchored tours.
//!
//! - [`two_opt_first`] — 2-opt, first improvement
//! - [`three_opt_first`] — 3-opt including 2-opt moves, first improvement
//!   over 3-opt reconnections
//! - [`optimize_segment`] / [`optimize_tour`] — run either engine on a
//!   depot-anchored path over global identities
//!
//! The engines work on the induced problem of one call ([`CandidateIndex`])
//! and skip points whose neighbourhood was already searched without success
//! ([`DontLookBits`]).

mod candidates;
mod circular;
mod dont_look;
mod moves;
mod segment;
mod stats;
mod three_opt;
mod two_opt;

pub use candidates::CandidateIndex;
pub use dont_look::DontLookBits;
pub use moves::{Move, MoveGain, Reconnection, ThreeOptMove, TwoOptMove};
pub use segment::{optimize_segment, optimize_tour, SegmentOutcome};
pub use stats::SearchStats;
pub use three_opt::three_opt_first;
pub use two_opt::two_opt_first;
