//! Query evaluation: locate, impute, blend, and tag each result.
//!
//! ```rust
//! use ndpolator::{Axis, Config, Extrapolation, Grid, Kind, Ndpolator, NdpError};
//!
//! // z = x + 2y
//! let x = Axis::new(vec![0.0_f64, 1.0, 2.0]).unwrap();
//! let y = Axis::new(vec![0.0_f64, 1.0]).unwrap();
//! let grid = Grid::from_fn(vec![x, y], |p| p[0] + 2.0 * p[1]).unwrap();
//!
//! let ndp = Ndpolator::new(&grid, Config::default());
//! let results = ndp.evaluate(&[[0.5, 0.5], [3.0, 0.0]]);
//!
//! let inside = results[0].as_ref().unwrap();
//! assert_eq!(inside.value, 1.5);
//! assert_eq!(inside.status.kind, Kind::Interpolated);
//!
//! let outside = results[1].as_ref().unwrap();
//! assert_eq!(outside.value, 3.0);
//! assert_eq!(outside.status.kind, Kind::Extrapolated);
//!
//! // The same query fails when extrapolation is disabled
//! let strict = Ndpolator::new(&grid, Config::default().extrapolation(Extrapolation::Disabled));
//! assert_eq!(
//!     strict.evaluate_one(&[3.0, 0.0]),
//!     Err(NdpError::OutOfBounds { axis: 0 })
//! );
//! ```
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::kernel::{clamp_fracs, multilinear_collapse};
use crate::{Config, Extrap, Extrapolation, Grid, Hypercube, Imputation, Imputer, Kind, NdpError};

/// How a result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    pub kind: Kind,
    /// At least one contributing corner was a void node filled by imputation
    pub imputed: bool,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Kind::OnGrid => "ON_GRID",
            Kind::Interpolated => "INTERPOLATED",
            Kind::Extrapolated => "EXTRAPOLATED",
        };
        if self.imputed {
            write!(f, "{kind}+IMPUTED")
        } else {
            write!(f, "{kind}")
        }
    }
}

/// A value and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation<T> {
    pub value: T,
    pub status: Status,
}

/// Evaluates query points against a borrowed grid under a fixed [`Config`].
///
/// Evaluation never mutates the grid, so one evaluator can serve any number of
/// threads, and batches are split across the rayon pool when the `parallel`
/// feature is enabled.
///
/// Operation Complexity
/// * O(ndims * log2(axis length)) to locate the cell
/// * O(2^ndims) to blend the corners
/// * Imputation adds a search whose radius grows until a defined node is found
#[derive(Debug, Clone, Copy)]
pub struct Ndpolator<'a, T: Float> {
    grid: &'a Grid<T>,
    config: Config,
}

impl<'a, T> Ndpolator<'a, T>
where
    T: Float + Send + Sync,
{
    pub fn new(grid: &'a Grid<T>, config: Config) -> Self {
        Self { grid, config }
    }

    #[inline]
    pub fn grid(&self) -> &'a Grid<T> {
        self.grid
    }

    #[inline]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Evaluate a single point.
    ///
    /// # Errors
    /// * `DimensionMismatch` if the point does not have one coordinate per axis
    /// * `NonFiniteQuery` if any coordinate is NaN or infinite
    /// * `OutOfBounds` if the point is outside the grid and extrapolation is disabled
    /// * `UndefinedRegion` if a weighted corner is void and imputation is disabled
    pub fn evaluate_one(&self, point: &[T]) -> Result<Evaluation<T>, NdpError> {
        let mut hc = Hypercube::locate(self.grid, point)?;
        let kind = hc.classify();

        if kind == Kind::Extrapolated {
            match self.config.extrapolation {
                Extrapolation::Disabled => {
                    let axis = hc
                        .extrap
                        .iter()
                        .position(|e| *e != Extrap::Inside)
                        .unwrap_or(0);
                    return Err(NdpError::OutOfBounds { axis });
                }
                Extrapolation::Linear => {}
                Extrapolation::Nearest => clamp_fracs(&mut hc.fracs),
            }
        }

        let mut imputed = false;
        if hc.has_contributing_voids() {
            match self.config.imputation {
                Imputation::Disabled => return Err(NdpError::UndefinedRegion),
                Imputation::Nearest => imputed = Imputer::new(self.grid).impute(&mut hc)?,
            }
        }

        // Voids left at this point carry no weight
        let mut vals: Vec<T> = hc
            .values
            .iter()
            .map(|v| v.unwrap_or_else(T::zero))
            .collect();
        let value = multilinear_collapse(&mut vals, &hc.fracs);

        Ok(Evaluation {
            value,
            status: Status { kind, imputed },
        })
    }

    /// Evaluate a batch of points, one result slot per point.
    ///
    /// A failed point does not affect the others; its slot holds the error.
    #[instrument(skip_all, fields(points = points.len()))]
    pub fn evaluate<P>(&self, points: &[P]) -> Vec<Result<Evaluation<T>, NdpError>>
    where
        P: AsRef<[T]> + Sync,
    {
        #[cfg(feature = "parallel")]
        let results: Vec<_> = points
            .par_iter()
            .map(|p| self.evaluate_one(p.as_ref()))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = points
            .iter()
            .map(|p| self.evaluate_one(p.as_ref()))
            .collect();

        let failures = results.iter().filter(|r| r.is_err()).count();
        debug!(failures, "batch evaluated");
        results
    }

    /// Evaluate a batch of points, stopping early once `cancel` is set.
    ///
    /// Points not yet started when cancellation is observed get `Cancelled` in
    /// their slot; points already evaluated keep their results.
    #[instrument(skip_all, fields(points = points.len()))]
    pub fn evaluate_cancellable<P>(
        &self,
        points: &[P],
        cancel: &AtomicBool,
    ) -> Vec<Result<Evaluation<T>, NdpError>>
    where
        P: AsRef<[T]> + Sync,
    {
        let eval = |p: &P| {
            if cancel.load(Ordering::Relaxed) {
                Err(NdpError::Cancelled)
            } else {
                self.evaluate_one(p.as_ref())
            }
        };

        #[cfg(feature = "parallel")]
        let results: Vec<_> = points.par_iter().map(eval).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = points.iter().map(eval).collect();

        let cancelled = results
            .iter()
            .filter(|r| matches!(r, Err(NdpError::Cancelled)))
            .count();
        if cancelled > 0 {
            warn!(cancelled, "batch evaluation cancelled");
        }
        results
    }

    /// Evaluate a batch of points, writing only the values to `out`.
    ///
    /// # Errors
    /// * `DimensionMismatch` if `out.len() != points.len()`
    /// * The first error encountered by any point
    pub fn evaluate_values<P>(&self, points: &[P], out: &mut [T]) -> Result<(), NdpError>
    where
        P: AsRef<[T]> + Sync,
    {
        if out.len() != points.len() {
            return Err(NdpError::DimensionMismatch {
                expected: points.len(),
                got: out.len(),
            });
        }

        #[cfg(feature = "parallel")]
        out.par_iter_mut()
            .zip(points.par_iter())
            .try_for_each(|(o, p)| {
                *o = self.evaluate_one(p.as_ref())?.value;
                Ok::<(), NdpError>(())
            })?;
        #[cfg(not(feature = "parallel"))]
        for (o, p) in out.iter_mut().zip(points) {
            *o = self.evaluate_one(p.as_ref())?.value;
        }

        Ok(())
    }
}

/// Evaluate a batch of points against `grid` under `config`.
///
/// This is a convenience function; construct an [`Ndpolator`] directly to reuse
/// it across batches.
pub fn ndpolate<T, P>(
    grid: &Grid<T>,
    points: &[P],
    config: Config,
) -> Vec<Result<Evaluation<T>, NdpError>>
where
    T: Float + Send + Sync,
    P: AsRef<[T]> + Sync,
{
    Ndpolator::new(grid, config).evaluate(points)
}

/// Evaluate a batch of points, allocating a new Vec for the values.
///
/// # Errors
/// * The first error encountered by any point
pub fn ndpolate_alloc<T, P>(grid: &Grid<T>, points: &[P], config: Config) -> Result<Vec<T>, NdpError>
where
    T: Float + Send + Sync,
    P: AsRef<[T]> + Sync,
{
    let mut out = vec![T::zero(); points.len()];
    Ndpolator::new(grid, config).evaluate_values(points, &mut out)?;
    Ok(out)
}
