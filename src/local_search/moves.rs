//! Move candidates produced by the neighbourhood scans.

use std::cmp::Ordering;

use super::DontLookBits;

/// Net cost change of a prospective move: cost added minus cost removed.
///
/// Negative deltas improve the tour. Degenerate candidates (coinciding
/// points, an edge that would be removed and re-added) are
/// [`Infeasible`](MoveGain::Infeasible), which sorts after every delta and
/// is never accepted.
///
/// # Examples
///
/// ```
/// use u_tour_opt::local_search::MoveGain;
///
/// let good = MoveGain::Delta(-3.0);
/// let bad = MoveGain::Infeasible;
/// assert!(good < bad);
/// assert!(good.improves_on(0.0, 1e-4));
/// assert!(!bad.improves_on(0.0, 1e-4));
/// ```
#[derive(Debug, Clone, Copy)]
pub enum MoveGain {
    Delta(f64),
    Infeasible,
}

impl MoveGain {
    /// `Delta(delta)` when `feasible`, otherwise `Infeasible`.
    #[inline]
    pub fn feasible_if(feasible: bool, delta: f64) -> Self {
        if feasible {
            Self::Delta(delta)
        } else {
            Self::Infeasible
        }
    }

    pub fn delta(self) -> Option<f64> {
        match self {
            Self::Delta(d) => Some(d),
            Self::Infeasible => None,
        }
    }

    /// Whether this move beats `current` by more than `epsilon`.
    #[inline]
    pub fn improves_on(self, current: f64, epsilon: f64) -> bool {
        matches!(self, Self::Delta(d) if d < current - epsilon)
    }
}

impl Ord for MoveGain {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Delta(a), Self::Delta(b)) => a.total_cmp(b),
            (Self::Delta(_), Self::Infeasible) => Ordering::Less,
            (Self::Infeasible, Self::Delta(_)) => Ordering::Greater,
            (Self::Infeasible, Self::Infeasible) => Ordering::Equal,
        }
    }
}

impl PartialOrd for MoveGain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MoveGain {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MoveGain {}

/// A 2-opt exchange: removes `(h1, h2)` and `(h3, h4)`, adds `(h1, h3)` and
/// `(h2, h4)`. `h2` follows `h1` and `h4` follows `h3` on the tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoOptMove {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub delta: f64,
}

impl TwoOptMove {
    pub fn new(h1: usize, h2: usize, h3: usize, h4: usize, delta: f64) -> Self {
        Self {
            h1,
            h2,
            h3,
            h4,
            delta,
        }
    }

    /// The four points whose incident edges change.
    pub fn endpoints(&self) -> [usize; 4] {
        [self.h1, self.h2, self.h3, self.h4]
    }
}

/// The 3-opt reconnections, named after the position of `c3` relative to
/// `c1` and `c2` and the edges severed at `c2` and `c3`.
///
/// `s`/`p` denote tour successor/predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconnection {
    /// `c3` lies in `(c1, c2]`: adds `(c1,c2)`, `(c3,s1)`, `(p3,s2)`.
    Between,
    /// Adds `(c1,c2)`, `(s1,c3)`, `(s2,s3)`.
    NotBetweenSuccessor,
    /// Adds `(c1,c2)`, `(s1,c3)`, `(p2,p3)`.
    NotBetweenPredecessor,
    /// Or-opt-like, no inversion: adds `(c1,c2)`, `(c3,s1)`, `(p2,s3)`.
    Cyclic,
}

/// One arc of the new cycle, given as an index into the three arcs of the
/// old tour and whether it is traversed backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArcRef {
    pub arc: usize,
    pub reversed: bool,
}

const fn fwd(arc: usize) -> ArcRef {
    ArcRef {
        arc,
        reversed: false,
    }
}

const fn rev(arc: usize) -> ArcRef {
    ArcRef {
        arc,
        reversed: true,
    }
}

impl Reconnection {
    /// The new cycle as a sequence of the old arcs `A = 0`, `B = 1`, `C = 2`,
    /// where the arcs run forward from the move's three start points and
    /// `C` always ends at `c1`.
    pub(crate) fn layout(self) -> [ArcRef; 3] {
        match self {
            Self::Between => [fwd(2), rev(1), fwd(0)],
            Self::NotBetweenSuccessor => [fwd(2), rev(0), rev(1)],
            Self::NotBetweenPredecessor => [fwd(2), fwd(1), rev(0)],
            Self::Cyclic => [fwd(2), fwd(1), fwd(0)],
        }
    }
}

/// A 3-opt exchange.
///
/// `starts` holds the first point of each of the three arcs the removed
/// edges cut the cycle into, in tour order; the removed edges are the ones
/// entering each start point. `touched` lists the six endpoints of removed
/// edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreeOptMove {
    pub reconnection: Reconnection,
    pub starts: [usize; 3],
    pub touched: [usize; 6],
    pub delta: f64,
}

impl ThreeOptMove {
    /// Arcs `[s1..p3]`, `[c3..c2]`, `[s2..c1]`.
    pub fn between(c1: usize, s1: usize, c2: usize, s2: usize, p3: usize, c3: usize, delta: f64) -> Self {
        Self {
            reconnection: Reconnection::Between,
            starts: [s1, c3, s2],
            touched: [c1, s1, c2, s2, p3, c3],
            delta,
        }
    }

    /// Arcs `[s1..c2]`, `[s2..c3]`, `[s3..c1]`.
    pub fn not_between_successor(
        c1: usize,
        s1: usize,
        c2: usize,
        s2: usize,
        c3: usize,
        s3: usize,
        delta: f64,
    ) -> Self {
        Self {
            reconnection: Reconnection::NotBetweenSuccessor,
            starts: [s1, s2, s3],
            touched: [c1, s1, c2, s2, c3, s3],
            delta,
        }
    }

    /// Arcs `[s1..p2]`, `[c2..p3]`, `[c3..c1]`.
    pub fn not_between_predecessor(
        c1: usize,
        s1: usize,
        p2: usize,
        c2: usize,
        p3: usize,
        c3: usize,
        delta: f64,
    ) -> Self {
        Self {
            reconnection: Reconnection::NotBetweenPredecessor,
            starts: [s1, c2, c3],
            touched: [c1, s1, p2, c2, p3, c3],
            delta,
        }
    }

    /// Arcs `[s1..p2]`, `[c2..c3]`, `[s3..c1]`.
    pub fn cyclic(c1: usize, s1: usize, p2: usize, c2: usize, c3: usize, s3: usize, delta: f64) -> Self {
        Self {
            reconnection: Reconnection::Cyclic,
            starts: [s1, c2, s3],
            touched: [c1, s1, p2, c2, c3, s3],
            delta,
        }
    }
}

/// A move chosen by a neighbourhood scan, ready to be applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Move {
    TwoOpt(TwoOptMove),
    ThreeOpt(ThreeOptMove),
}

impl Move {
    pub fn delta(&self) -> f64 {
        match self {
            Self::TwoOpt(m) => m.delta,
            Self::ThreeOpt(m) => m.delta,
        }
    }

    /// Clears the don't-look bits of every endpoint of a changed edge.
    pub fn wake(&self, bits: &mut DontLookBits) {
        match self {
            Self::TwoOpt(m) => bits.clear_all(&m.endpoints()),
            Self::ThreeOpt(m) => bits.clear_all(&m.touched),
        }
    }
}
