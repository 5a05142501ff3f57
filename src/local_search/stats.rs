//! Counters reported by a local search run.

/// What one engine run did before reaching its local optimum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    /// Full sweeps over the scan order, including the final one that found
    /// nothing.
    pub sweeps: usize,
    /// Accepted moves.
    pub moves: usize,
    /// Sum of the cost decreases of all accepted moves.
    pub improvement: f64,
}

impl SearchStats {
    pub(crate) fn record_move(&mut self, delta: f64) {
        self.moves += 1;
        self.improvement -= delta;
    }

    /// Returns `true` when the input was already a local optimum.
    pub fn is_unchanged(&self) -> bool {
        self.moves == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_move() {
        let mut stats = SearchStats::default();
        assert!(stats.is_unchanged());
        stats.record_move(-1.5);
        stats.record_move(-0.5);
        assert_eq!(stats.moves, 2);
        assert!((stats.improvement - 2.0).abs() < 1e-12);
        assert!(!stats.is_unchanged());
    }
}
