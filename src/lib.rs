//! # u-tour-opt
//!
//! Improvement of depot-anchored tours with candidate-list 2-opt and 3-opt
//! local search and don't-look bits.
//!
//! ## Modules
//!
//! - [`models`] — Anchored path type and path cost
//! - [`distance`] — Distance oracle trait and dense distance matrix
//! - [`local_search`] — Candidate lists, the 2-opt/3-opt engines and the
//!   anchored segment optimiser
//! - [`config`] — Optimiser options
//! - [`error`] — Precondition errors
//!
//! ## Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use u_tour_opt::config::OptimizerConfig;
//! use u_tour_opt::distance::DistanceMatrix;
//! use u_tour_opt::local_search::optimize_tour;
//! use u_tour_opt::models::Tour;
//!
//! let dm = DistanceMatrix::from_points(&[
//!     (0.0, 0.0),
//!     (0.0, 10.0),
//!     (10.0, 10.0),
//!     (10.0, 0.0),
//! ]);
//! // depot → (0,10) → (10,0) → (10,10) → depot crosses itself.
//! let mut tour = Tour::from_interior(0, &[1, 3, 2]).unwrap();
//! let before = tour.cost(&dm);
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! optimize_tour(&mut tour, &dm, &OptimizerConfig::default(), &mut rng).unwrap();
//! assert!(tour.cost(&dm) < before);
//! assert_eq!(tour.anchor(), 0);
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod local_search;
pub mod models;

pub use error::{Error, Result};
