//! Induced sub-problem: distance submatrix plus nearest-neighbour lists.

use crate::distance::{DistanceMatrix, DistanceOracle};
use crate::error::{Error, Result};
use crate::models::validate_path;

/// Relative slack allowed between `d(a, b)` and `d(b, a)`.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Distances and candidate lists for the `n` points of one optimisation call.
///
/// Points are local identities `0..n`. For every point the other `n - 1`
/// points are kept sorted by ascending distance (ties by identity). The
/// engines only consult a prefix of each list, and rely on the ordering to
/// stop scanning once a candidate is too far away to help.
///
/// # Examples
///
/// ```
/// use u_tour_opt::local_search::CandidateIndex;
///
/// let xs = [0.0_f64, 10.0, 3.0, 6.0];
/// let index = CandidateIndex::new(4, |a, b| (xs[a] - xs[b]).abs()).unwrap();
/// assert_eq!(index.neighbors(0), &[2, 3, 1]);
/// assert_eq!(index.nearest(0, 2), &[2, 3]);
/// assert_eq!(index.distance(1, 3), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    distances: DistanceMatrix,
    neighbors: Vec<Vec<usize>>,
}

impl CandidateIndex {
    /// Builds the index for `n` points from a cost function over local
    /// identities.
    ///
    /// Fails if `n < 2`, any cost is negative or non-finite, or the two
    /// directions of a pair differ beyond rounding noise. Reported
    /// identities are local.
    pub fn new(n: usize, cost: impl Fn(usize, usize) -> f64) -> Result<Self> {
        if n < 2 {
            return Err(Error::TooFewPoints(n));
        }
        let distances = DistanceMatrix::from_fn(n, cost);
        for from in 0..n {
            for (to, &value) in distances.row(from).iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::InvalidDistance { from, to, value });
                }
            }
        }
        let largest = (0..n)
            .flat_map(|i| distances.row(i).iter())
            .fold(0.0_f64, |m, &v| m.max(v));
        if let Some((from, to)) = distances.first_asymmetry(SYMMETRY_TOLERANCE * largest.max(1.0)) {
            return Err(Error::AsymmetricDistance {
                from,
                to,
                forward: distances.get(from, to),
                backward: distances.get(to, from),
            });
        }

        let neighbors = (0..n)
            .map(|i| {
                let row = distances.row(i);
                let mut others: Vec<usize> = (0..n).filter(|&j| j != i).collect();
                others.sort_by(|&a, &b| row[a].total_cmp(&row[b]).then(a.cmp(&b)));
                others
            })
            .collect();

        Ok(Self {
            distances,
            neighbors,
        })
    }

    /// Builds the index induced by an anchored path over global identities.
    ///
    /// Position `i` of the path (closing anchor excluded) becomes local
    /// identity `i`, so the anchor is always local identity `0`. Distance
    /// errors name the global identities.
    pub fn from_path<D: DistanceOracle + ?Sized>(path: &[usize], oracle: &D) -> Result<Self> {
        validate_path(path)?;
        let points = &path[..path.len() - 1];
        Self::new(points.len(), |a, b| oracle.distance(points[a], points[b])).map_err(|err| match err {
            Error::InvalidDistance { from, to, value } => Error::InvalidDistance {
                from: points[from],
                to: points[to],
                value,
            },
            Error::AsymmetricDistance {
                from,
                to,
                forward,
                backward,
            } => Error::AsymmetricDistance {
                from: points[from],
                to: points[to],
                forward,
                backward,
            },
            other => other,
        })
    }

    /// Number of induced points.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Always `false`: an index holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Cost between two local identities.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Every other point, nearest first.
    pub fn neighbors(&self, point: usize) -> &[usize] {
        &self.neighbors[point]
    }

    /// The first `k` entries of [`neighbors`](Self::neighbors).
    #[inline]
    pub fn nearest(&self, point: usize, k: usize) -> &[usize] {
        let list = &self.neighbors[point];
        &list[..k.min(list.len())]
    }

    /// The induced submatrix.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &'static [f64]) -> impl Fn(usize, usize) -> f64 {
        move |a, b| (xs[a] - xs[b]).abs()
    }

    #[test]
    fn test_lists_sorted_ascending() {
        let index = CandidateIndex::new(5, line(&[0.0, 7.0, 1.0, 4.0, 9.0])).expect("valid");
        for p in 0..5 {
            let list = index.neighbors(p);
            assert_eq!(list.len(), 4);
            assert!(!list.contains(&p));
            for w in list.windows(2) {
                assert!(index.distance(p, w[0]) <= index.distance(p, w[1]));
            }
        }
        assert_eq!(index.neighbors(3), &[1, 2, 0, 4]);
    }

    #[test]
    fn test_ties_break_by_identity() {
        let index = CandidateIndex::new(4, line(&[0.0, 1.0, -1.0, 5.0])).expect("valid");
        assert_eq!(index.neighbors(0), &[1, 2, 3]);
    }

    #[test]
    fn test_nearest_truncates() {
        let index = CandidateIndex::new(4, line(&[0.0, 1.0, 2.0, 3.0])).expect("valid");
        assert_eq!(index.nearest(0, 1), &[1]);
        assert_eq!(index.nearest(0, 20), &[1, 2, 3]);
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(
            CandidateIndex::new(1, |_, _| 0.0).err(),
            Some(Error::TooFewPoints(1))
        );
    }

    #[test]
    fn test_invalid_distance() {
        let err = CandidateIndex::new(2, |a, b| if a == 1 && b == 0 { -1.0 } else { 1.0 }).err();
        assert_eq!(
            err,
            Some(Error::InvalidDistance {
                from: 1,
                to: 0,
                value: -1.0
            })
        );
        assert!(CandidateIndex::new(2, |_, _| f64::INFINITY).is_err());
    }

    #[test]
    fn test_asymmetric_costs_rejected() {
        let err = CandidateIndex::new(3, |a, b| if a == 2 && b == 1 { 4.0 } else { 1.0 }).err();
        assert_eq!(
            err,
            Some(Error::AsymmetricDistance {
                from: 1,
                to: 2,
                forward: 1.0,
                backward: 4.0
            })
        );
    }

    #[test]
    fn test_rounding_noise_is_symmetric_enough() {
        let index = CandidateIndex::new(2, |a, b| if a < b { 1000.0 } else { 1000.0 + 1e-10 });
        assert!(index.is_ok());
    }

    #[test]
    fn test_from_path_maps_positions() {
        // Global points 9 (anchor), 4, 6 on a line.
        let xs = |p: usize| match p {
            9 => 0.0,
            4 => 5.0,
            6 => 2.0,
            _ => unreachable!(),
        };
        let oracle = move |a: usize, b: usize| f64::abs(xs(a) - xs(b));
        let index = CandidateIndex::from_path(&[9, 4, 6, 9], &oracle).expect("valid");
        assert_eq!(index.len(), 3);
        assert_eq!(index.distance(0, 1), 5.0);
        assert_eq!(index.distance(0, 2), 2.0);
        assert_eq!(index.neighbors(0), &[2, 1]);
    }

    #[test]
    fn test_from_path_requires_anchor() {
        let oracle = |_: usize, _: usize| 1.0;
        assert!(matches!(
            CandidateIndex::from_path(&[0, 1, 2], &oracle),
            Err(Error::MissingAnchor { .. })
        ));
        assert!(matches!(
            CandidateIndex::from_path(&[0, 0], &oracle),
            Err(Error::TooFewPoints(1))
        ));
    }
}
