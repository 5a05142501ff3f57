//! Don't-look bits.

/// Per-point flags that let a sweep skip points whose neighbourhood has
/// not changed since their last fruitless evaluation.
///
/// All bits start cleared. A point is marked after it is evaluated without
/// yielding a move; the endpoints of every edge touched by an accepted move
/// are cleared again.
///
/// # Examples
///
/// ```
/// use u_tour_opt::local_search::DontLookBits;
///
/// let mut bits = DontLookBits::new(4);
/// bits.set(2);
/// assert!(bits.is_set(2));
/// bits.clear_all(&[1, 2]);
/// assert!(!bits.is_set(2));
/// ```
#[derive(Debug, Clone)]
pub struct DontLookBits {
    bits: Vec<bool>,
}

impl DontLookBits {
    pub fn new(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    #[inline]
    pub fn is_set(&self, point: usize) -> bool {
        self.bits[point]
    }

    #[inline]
    pub fn set(&mut self, point: usize) {
        self.bits[point] = true;
    }

    #[inline]
    pub fn clear(&mut self, point: usize) {
        self.bits[point] = false;
    }

    /// Clears the bit of every listed point.
    pub fn clear_all(&mut self, points: &[usize]) {
        for &p in points {
            self.clear(p);
        }
    }

    /// Clears every bit.
    pub fn reset(&mut self) {
        self.bits.fill(false);
    }

    /// Number of points currently skipped.
    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_cleared() {
        let bits = DontLookBits::new(5);
        assert!((0..5).all(|p| !bits.is_set(p)));
        assert_eq!(bits.count_set(), 0);
    }

    #[test]
    fn test_set_and_clear() {
        let mut bits = DontLookBits::new(5);
        for p in 0..5 {
            bits.set(p);
        }
        assert_eq!(bits.count_set(), 5);
        bits.clear_all(&[0, 3, 3, 4]);
        assert_eq!(bits.count_set(), 2);
        assert!(bits.is_set(1) && bits.is_set(2));
        bits.reset();
        assert_eq!(bits.count_set(), 0);
    }
}
