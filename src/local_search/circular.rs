//! Circular tour with an inverse position index.

use std::mem;

use crate::error::{Error, Result};

use super::moves::{ArcRef, ThreeOptMove, TwoOptMove};

/// A run of consecutive tour positions, read forward.
#[derive(Debug, Clone, Copy)]
struct Arc {
    start: usize,
    len: usize,
}

/// The tour array, its sentinel and the position index, kept in lockstep.
///
/// `tour[n]` mirrors `tour[0]` so the successor of any point is a plain
/// `tour[pos[p] + 1]` lookup. All writes go through [`place`](Self::place).
#[derive(Debug, Clone)]
pub(crate) struct CircularTour {
    tour: Vec<usize>,
    pos: Vec<usize>,
    scratch: [Vec<usize>; 2],
}

impl CircularTour {
    /// Builds the circular tour from a permutation of `0..n`.
    pub fn from_order(order: &[usize], n: usize) -> Result<Self> {
        if order.len() != n {
            return Err(Error::SizeMismatch {
                expected: n,
                actual: order.len(),
            });
        }
        let mut seen = vec![false; n];
        for &p in order {
            if p >= n {
                return Err(Error::PointOutOfRange { point: p, size: n });
            }
            if mem::replace(&mut seen[p], true) {
                return Err(Error::DuplicatePoint { point: p });
            }
        }

        let mut circular = Self {
            tour: vec![0; n + 1],
            pos: vec![0; n],
            scratch: [Vec::with_capacity(n), Vec::with_capacity(n)],
        };
        for (i, &p) in order.iter().enumerate() {
            circular.place(i, p);
        }
        Ok(circular)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    /// The tour without its sentinel.
    pub fn order(&self) -> &[usize] {
        &self.tour[..self.len()]
    }

    #[inline]
    pub fn successor(&self, point: usize) -> usize {
        self.tour[self.pos[point] + 1]
    }

    #[inline]
    pub fn predecessor(&self, point: usize) -> usize {
        match self.pos[point] {
            0 => self.tour[self.len() - 1],
            i => self.tour[i - 1],
        }
    }

    /// Whether `x` lies in the cyclic interval `(from, to]`.
    pub fn between(&self, from: usize, to: usize, x: usize) -> bool {
        let offset = self.offset(from, x);
        offset != 0 && offset <= self.offset(from, to)
    }

    /// Forward distance in positions from `from` to `to`.
    fn offset(&self, from: usize, to: usize) -> usize {
        let n = self.len();
        (self.pos[to] + n - self.pos[from]) % n
    }

    /// Writes `point` at `index`, updating its position and the sentinel.
    #[inline]
    fn place(&mut self, index: usize, point: usize) {
        self.tour[index] = point;
        self.pos[point] = index;
        if index == 0 {
            let n = self.len();
            self.tour[n] = point;
        }
    }

    /// Reverses `len` positions starting at `start`, wrapping around.
    fn reverse_run(&mut self, start: usize, len: usize) {
        let n = self.len();
        if len < 2 {
            return;
        }
        let mut i = start;
        let mut j = (start + len - 1) % n;
        for _ in 0..len / 2 {
            let (a, b) = (self.tour[i], self.tour[j]);
            self.place(i, b);
            self.place(j, a);
            i = (i + 1) % n;
            j = (j + n - 1) % n;
        }
    }

    /// Applies a 2-opt exchange by reversing whichever side of the cycle is
    /// shorter.
    ///
    /// # Panics
    ///
    /// Panics if the move's edges are not tour edges.
    pub fn apply_two_opt(&mut self, mv: &TwoOptMove) {
        if self.successor(mv.h1) != mv.h2 || self.successor(mv.h3) != mv.h4 {
            log::error!("stale 2-opt move {mv:?} on tour {:?}", self.order());
            panic!(
                "2-opt move {mv:?} does not remove two tour edges (successors {} and {})",
                self.successor(mv.h1),
                self.successor(mv.h3)
            );
        }
        let n = self.len();
        let (a, b, c, d) = if self.pos[mv.h3] < self.pos[mv.h1] {
            (mv.h3, mv.h4, mv.h1, mv.h2)
        } else {
            (mv.h1, mv.h2, mv.h3, mv.h4)
        };
        debug_assert!(self.pos[a] < self.pos[c]);
        // b follows a at a position no later than c.
        let inner = self.pos[c] - self.pos[b] + 1;
        if inner < n / 2 + 1 {
            self.reverse_run(self.pos[b], inner);
        } else {
            self.reverse_run(self.pos[d], n - inner);
        }
    }

    /// Applies a 3-opt reconnection.
    ///
    /// The longest of the three arcs stays where it is; the other two are
    /// copied out (in their new orientation) and written back right after it.
    ///
    /// # Panics
    ///
    /// Panics if the move's start points do not split the tour into three
    /// non-empty arcs in tour order.
    pub fn apply_three_opt(&mut self, mv: &ThreeOptMove) {
        let n = self.len();
        let starts = mv.starts.map(|p| self.pos[p]);
        let arcs: [Arc; 3] = std::array::from_fn(|i| Arc {
            start: starts[i],
            len: (starts[(i + 1) % 3] + n - starts[i]) % n,
        });
        let total: usize = arcs.iter().map(|a| a.len).sum();
        if total != n || arcs.iter().any(|a| a.len == 0) {
            log::error!("stale 3-opt move {mv:?} on tour {:?}", self.order());
            panic!(
                "{:?} reconnection does not split the tour into three arcs: starts {:?}, \
                 arc lengths {:?}, tour size {n}",
                mv.reconnection,
                mv.starts,
                arcs.map(|a| a.len)
            );
        }

        let longest = (1..3).fold(0, |best, i| if arcs[i].len > arcs[best].len { i } else { best });
        let cycle = anchor_cycle(mv.reconnection.layout(), longest);

        let mut first = mem::take(&mut self.scratch[0]);
        let mut second = mem::take(&mut self.scratch[1]);
        self.copy_arc(arcs[cycle[1].arc], cycle[1].reversed, &mut first);
        self.copy_arc(arcs[cycle[2].arc], cycle[2].reversed, &mut second);

        let fixed = arcs[longest];
        let mut at = (fixed.start + fixed.len) % n;
        for &p in first.iter().chain(second.iter()) {
            self.place(at, p);
            at = (at + 1) % n;
        }
        self.scratch = [first, second];
    }

    fn copy_arc(&self, arc: Arc, reversed: bool, out: &mut Vec<usize>) {
        let n = self.len();
        out.clear();
        if reversed {
            out.extend((0..arc.len).rev().map(|i| self.tour[(arc.start + i) % n]));
        } else {
            out.extend((0..arc.len).map(|i| self.tour[(arc.start + i) % n]));
        }
    }
}

/// Rewrites a cyclic arc sequence so that `arc` comes first, read forward.
///
/// Reading the whole cycle backwards flips every arc, which is how an arc
/// that the layout reverses is turned back into a forward one.
fn anchor_cycle(mut cycle: [ArcRef; 3], arc: usize) -> [ArcRef; 3] {
    if cycle.iter().any(|r| r.arc == arc && r.reversed) {
        cycle.reverse();
        for r in &mut cycle {
            r.reversed = !r.reversed;
        }
    }
    if let Some(at) = cycle.iter().position(|r| r.arc == arc) {
        cycle.rotate_left(at);
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::moves::Reconnection;

    fn assert_consistent(t: &CircularTour) {
        let n = t.len();
        for i in 0..n {
            assert_eq!(t.pos[t.order()[i]], i);
        }
        assert_eq!(t.tour[n], t.tour[0]);
        let mut sorted = t.order().to_vec();
        sorted.sort();
        assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    /// Undirected edge set of the cycle.
    fn edges(order: &[usize]) -> Vec<(usize, usize)> {
        let n = order.len();
        let mut e: Vec<(usize, usize)> = (0..n)
            .map(|i| {
                let (a, b) = (order[i], order[(i + 1) % n]);
                (a.min(b), a.max(b))
            })
            .collect();
        e.sort();
        e
    }

    fn edge(a: usize, b: usize) -> (usize, usize) {
        (a.min(b), a.max(b))
    }

    /// Checks that exactly `removed` left the cycle and `added` joined it.
    fn assert_exchange(before: &[usize], after: &[usize], removed: &[(usize, usize)], added: &[(usize, usize)]) {
        let mut expected: Vec<(usize, usize)> = edges(before)
            .into_iter()
            .filter(|e| !removed.contains(e))
            .collect();
        expected.extend(added.iter().copied());
        expected.sort();
        assert_eq!(edges(after), expected);
    }

    #[test]
    fn test_from_order_rejects_bad_permutations() {
        assert!(matches!(
            CircularTour::from_order(&[0, 1], 3),
            Err(Error::SizeMismatch { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            CircularTour::from_order(&[0, 1, 3], 3),
            Err(Error::PointOutOfRange { point: 3, size: 3 })
        ));
        assert!(matches!(
            CircularTour::from_order(&[0, 1, 1], 3),
            Err(Error::DuplicatePoint { point: 1 })
        ));
    }

    #[test]
    fn test_neighbours_wrap() {
        let t = CircularTour::from_order(&[3, 0, 2, 1], 4).expect("valid");
        assert_consistent(&t);
        assert_eq!(t.successor(1), 3);
        assert_eq!(t.predecessor(3), 1);
        assert_eq!(t.successor(0), 2);
        assert_eq!(t.predecessor(0), 3);
    }

    #[test]
    fn test_between() {
        let t = CircularTour::from_order(&[0, 1, 2, 3, 4, 5], 6).expect("valid");
        assert!(t.between(1, 3, 2));
        assert!(t.between(1, 3, 3));
        assert!(!t.between(1, 3, 1));
        assert!(!t.between(1, 3, 4));
        // Wrapping interval (4, 1].
        assert!(t.between(4, 1, 5));
        assert!(t.between(4, 1, 0));
        assert!(t.between(4, 1, 1));
        assert!(!t.between(4, 1, 2));
    }

    #[test]
    fn test_two_opt_inner_reversal() {
        let before: Vec<usize> = (0..8).collect();
        let mut t = CircularTour::from_order(&before, 8).expect("valid");
        t.apply_two_opt(&TwoOptMove::new(1, 2, 4, 5, -1.0));
        assert_consistent(&t);
        assert_eq!(t.order(), &[0, 1, 4, 3, 2, 5, 6, 7]);
    }

    #[test]
    fn test_two_opt_outer_reversal_refreshes_sentinel() {
        let before: Vec<usize> = (0..8).collect();
        let mut t = CircularTour::from_order(&before, 8).expect("valid");
        // Inner side 2..=6 is longer than half, so the outer side 7,0,1 flips.
        t.apply_two_opt(&TwoOptMove::new(6, 7, 1, 2, -1.0));
        assert_consistent(&t);
        assert_exchange(&before, t.order(), &[edge(6, 7), edge(1, 2)], &[edge(6, 1), edge(7, 2)]);
        assert_eq!(t.pos[2], 2);
        assert_eq!(t.pos[6], 6);
    }

    #[test]
    fn test_two_opt_swapped_endpoints() {
        let before: Vec<usize> = (0..6).collect();
        let mut t = CircularTour::from_order(&before, 6).expect("valid");
        t.apply_two_opt(&TwoOptMove::new(3, 4, 0, 1, -1.0));
        assert_consistent(&t);
        assert_exchange(&before, t.order(), &[edge(3, 4), edge(0, 1)], &[edge(3, 0), edge(4, 1)]);
    }

    #[test]
    #[should_panic(expected = "does not remove two tour edges")]
    fn test_two_opt_rejects_non_edges() {
        let mut t = CircularTour::from_order(&[0, 1, 2, 3, 4], 5).expect("valid");
        t.apply_two_opt(&TwoOptMove::new(0, 2, 3, 4, -1.0));
    }

    fn run_three_opt(n: usize, mv: ThreeOptMove, removed: &[(usize, usize)], added: &[(usize, usize)]) {
        // Every rotation of the array, so each arc wraps past the end once.
        for shift in 0..n {
            let before: Vec<usize> = (0..n).map(|i| (i + shift) % n).collect();
            let mut t = CircularTour::from_order(&before, n).expect("valid");
            t.apply_three_opt(&mv);
            assert_consistent(&t);
            assert_exchange(&before, t.order(), removed, added);
        }
    }

    #[test]
    fn test_three_opt_between() {
        // c1=0 s1=1 .. p3=3 c3=4 .. c2=6 s2=7 .. (n=10)
        let mv = ThreeOptMove::between(0, 1, 6, 7, 3, 4, -1.0);
        run_three_opt(
            10,
            mv,
            &[edge(0, 1), edge(6, 7), edge(3, 4)],
            &[edge(0, 6), edge(4, 1), edge(3, 7)],
        );
    }

    #[test]
    fn test_three_opt_between_with_c3_equal_c2() {
        let mv = ThreeOptMove::between(0, 1, 5, 6, 4, 5, -1.0);
        run_three_opt(
            9,
            mv,
            &[edge(0, 1), edge(5, 6), edge(4, 5)],
            &[edge(0, 5), edge(5, 1), edge(4, 6)],
        );
    }

    #[test]
    fn test_three_opt_not_between_successor() {
        // c1=0 s1=1 .. c2=3 s2=4 .. c3=7 s3=8 .. (n=11)
        let mv = ThreeOptMove::not_between_successor(0, 1, 3, 4, 7, 8, -1.0);
        run_three_opt(
            11,
            mv,
            &[edge(0, 1), edge(3, 4), edge(7, 8)],
            &[edge(0, 3), edge(1, 7), edge(4, 8)],
        );
    }

    #[test]
    fn test_three_opt_not_between_predecessor() {
        // c1=0 s1=1 .. p2=2 c2=3 .. p3=6 c3=7 .. (n=9)
        let mv = ThreeOptMove::not_between_predecessor(0, 1, 2, 3, 6, 7, -1.0);
        run_three_opt(
            9,
            mv,
            &[edge(0, 1), edge(2, 3), edge(6, 7)],
            &[edge(0, 3), edge(1, 7), edge(2, 6)],
        );
    }

    #[test]
    fn test_three_opt_cyclic() {
        // c1=0 s1=1 .. p2=4 c2=5 .. c3=6 s3=7 .. (n=8)
        let mv = ThreeOptMove::cyclic(0, 1, 4, 5, 6, 7, -1.0);
        run_three_opt(
            8,
            mv,
            &[edge(0, 1), edge(4, 5), edge(6, 7)],
            &[edge(0, 5), edge(6, 1), edge(4, 7)],
        );
    }

    #[test]
    fn test_three_opt_cyclic_keeps_orientation() {
        let mut t = CircularTour::from_order(&(0..8).collect::<Vec<_>>(), 8).expect("valid");
        t.apply_three_opt(&ThreeOptMove::cyclic(0, 1, 4, 5, 6, 7, -1.0));
        // Segment 5,6 moves between 0 and 1 without inversion.
        let order = t.order();
        let at = order.iter().position(|&p| p == 0).expect("present");
        let read: Vec<usize> = (0..8).map(|i| order[(at + i) % 8]).collect();
        assert!(read == vec![0, 5, 6, 1, 2, 3, 4, 7] || read == vec![0, 7, 4, 3, 2, 1, 6, 5]);
    }

    #[test]
    #[should_panic(expected = "does not split the tour into three arcs")]
    fn test_three_opt_rejects_out_of_order_starts() {
        let mut t = CircularTour::from_order(&(0..6).collect::<Vec<_>>(), 6).expect("valid");
        let mut mv = ThreeOptMove::cyclic(0, 1, 2, 3, 4, 5, -1.0);
        mv.starts = [1, 5, 3];
        t.apply_three_opt(&mv);
    }

    #[test]
    fn test_anchor_cycle() {
        let layout = Reconnection::NotBetweenSuccessor.layout();
        let cycle = anchor_cycle(layout, 0);
        assert_eq!(cycle[0].arc, 0);
        assert!(!cycle[0].reversed);
        assert_eq!(cycle[1].arc, 2);
        assert!(cycle[1].reversed);
        assert_eq!(cycle[2].arc, 1);
        assert!(!cycle[2].reversed);
    }
}
