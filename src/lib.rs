//! N-dimensional linear interpolation, extrapolation and void imputation on rectilinear grids.
//!
//! A [`Grid`] holds values sampled on the cartesian product of N [`Axis`] breakpoint lists,
//! some of which may be void (undefined). An [`Ndpolator`] evaluates arbitrary query points
//! against the grid:
//!
//! * Inside the grid, the 2^ndims corners of the enclosing cell are blended multilinearly.
//! * Outside the grid, the same blend is applied to the boundary cell with fractions outside
//!   `[0, 1]`, which continues the boundary gradient linearly
//!   (or holds the boundary value, see [`Extrapolation`]).
//! * Void corners that carry weight are filled from their nearest defined neighbours
//!   before blending (see [`Imputer`]).
//!
//! Each result carries a [`Status`] saying whether the point was on a node, interpolated or
//! extrapolated, and whether any imputation took place.
//!
//! # Performance Scalings
//! There are 2^ndims grid values that contribute to each observation point, which is the
//! theoretical floor for performance scaling. Locating the cell takes a bisection search on
//! each axis, for a worst-case number of iterations of log2(number of grid elements).
//! Imputation only runs for cells with weighted void corners, and searches outward from each
//! void node until it meets a defined one.
//!
//! | Stage        | RAM              | Cost                                  |
//! |--------------|------------------|---------------------------------------|
//! | locate       | O(2^ndims)       | O(ndims * log2(axis length))          |
//! | blend        | O(2^ndims)       | O(2^ndims)                            |
//! | impute       | O(ndims)         | O(shell size) per radius searched     |
//!
//! # Example
//! ```rust
//! use ndpolator::{Axis, Config, Grid, Kind, Ndpolator};
//!
//! // Define a grid, with one void node
//! let x = Axis::new(vec![0.0_f64, 1.0, 2.0]).unwrap();
//! let y = Axis::new(vec![0.0_f64, 1.0]).unwrap();
//! let z = vec![0.0, 2.0, f64::NAN, 3.0, 2.0, 4.0]; // z = x + 2y, (1, 0) missing
//! let grid = Grid::new(vec![x, y], z).unwrap();
//!
//! // Points to interpolate/extrapolate
//! let obs = [[0.5, 0.5], [1.5, 1.0], [-1.0, 0.5]];
//!
//! let ndp = Ndpolator::new(&grid, Config::default());
//! let results = ndp.evaluate(&obs);
//!
//! let first = results[0].as_ref().unwrap();
//! assert!(first.status.imputed);
//! assert_eq!(first.status.kind, Kind::Interpolated);
//!
//! // The void node carries no weight on the upper edge
//! let second = results[1].as_ref().unwrap();
//! assert_eq!(second.value, 3.5);
//! assert!(!second.status.imputed);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod axis;
pub use axis::{Axis, Extrap, Location};

pub mod grid;
pub use grid::{Grid, Voids};

pub mod hypercube;
pub use hypercube::{check_bounds, Hypercube, Kind};

pub mod impute;
pub use impute::Imputer;

pub mod kernel;

pub mod config;
pub use config::{Config, Extrapolation, Imputation};

pub mod engine;
pub use engine::{ndpolate, ndpolate_alloc, Evaluation, Ndpolator, Status};

mod error;
pub use error::NdpError;

pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
