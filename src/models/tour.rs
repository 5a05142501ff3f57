//! Depot-anchored open paths.

use std::collections::HashSet;

use crate::distance::DistanceOracle;
use crate::error::{Error, Result};

/// An open path over global point identities that starts and ends at the
/// same anchor (typically the depot).
///
/// A vehicle route `depot → c1 → … → ck → depot` is stored as
/// `[depot, c1, …, ck, depot]`. The anchor never appears in the interior and
/// no interior point repeats.
///
/// # Examples
///
/// ```
/// use u_tour_opt::models::Tour;
///
/// let tour = Tour::from_interior(0, &[4, 2, 7]).unwrap();
/// assert_eq!(tour.points(), &[0, 4, 2, 7, 0]);
/// assert_eq!(tour.interior(), &[4, 2, 7]);
/// assert_eq!(tour.anchor(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    points: Vec<usize>,
}

impl Tour {
    /// Wraps an anchored path, rejecting malformed ones.
    pub fn new(points: Vec<usize>) -> Result<Self> {
        validate_path(&points)?;
        Ok(Self { points })
    }

    /// Builds `[anchor, interior…, anchor]`.
    pub fn from_interior(anchor: usize, interior: &[usize]) -> Result<Self> {
        let mut points = Vec::with_capacity(interior.len() + 2);
        points.push(anchor);
        points.extend_from_slice(interior);
        points.push(anchor);
        Self::new(points)
    }

    /// The anchor found at both ends.
    pub fn anchor(&self) -> usize {
        self.points[0]
    }

    /// The full path, anchor at both ends.
    pub fn points(&self) -> &[usize] {
        &self.points
    }

    /// The visited points between the two anchor entries.
    pub fn interior(&self) -> &[usize] {
        &self.points[1..self.points.len() - 1]
    }

    /// Number of entries including both anchor entries.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` for the anchor-only round trip `[anchor, anchor]`.
    pub fn is_empty(&self) -> bool {
        self.points.len() == 2
    }

    /// Total travel cost along the path.
    pub fn cost<D: DistanceOracle + ?Sized>(&self, oracle: &D) -> f64 {
        path_cost(&self.points, oracle)
    }

    /// Consumes the tour, returning the underlying path.
    pub fn into_points(self) -> Vec<usize> {
        self.points
    }

    /// Replaces the whole path with an already validated one.
    pub(crate) fn replace_points(&mut self, points: Vec<usize>) {
        debug_assert!(validate_path(&points).is_ok());
        self.points = points;
    }
}

/// Sum of consecutive leg costs along `path`.
///
/// # Examples
///
/// ```
/// use u_tour_opt::distance::DistanceMatrix;
/// use u_tour_opt::models::path_cost;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// assert!((path_cost(&[0, 1, 2, 0], &dm) - 4.0).abs() < 1e-10);
/// ```
pub fn path_cost<D: DistanceOracle + ?Sized>(path: &[usize], oracle: &D) -> f64 {
    path.windows(2).map(|w| oracle.distance(w[0], w[1])).sum()
}

/// Checks that `path` is anchored at both ends and visits each point once.
pub fn validate_path(path: &[usize]) -> Result<()> {
    if path.len() < 2 {
        return Err(Error::PathTooShort { len: path.len() });
    }
    let (first, last) = (path[0], path[path.len() - 1]);
    if first != last {
        return Err(Error::MissingAnchor { first, last });
    }
    let mut seen = HashSet::with_capacity(path.len());
    for &point in &path[..path.len() - 1] {
        if !seen.insert(point) {
            return Err(Error::DuplicatePoint { point });
        }
    }
    Ok(())
}
