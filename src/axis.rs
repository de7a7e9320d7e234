//! Breakpoint axes and interval location along a single dimension.
//!
//! ```rust
//! use ndpolator::{Axis, Extrap};
//!
//! let x = Axis::new(vec![0.0_f64, 1.0, 3.0]).unwrap();
//!
//! let loc = x.locate(2.0);
//! assert_eq!(loc.index, 1);
//! assert_eq!(loc.frac, 0.5);
//! assert_eq!(loc.extrap, Extrap::Inside);
//!
//! // Outside the axis, the boundary interval is reused
//! let loc = x.locate(5.0);
//! assert_eq!(loc.index, 1);
//! assert_eq!(loc.frac, 2.0);
//! assert_eq!(loc.extrap, Extrap::OutsideHigh);
//! ```
use num_traits::Float;

use crate::NdpError;

/// Extrapolation flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrap {
    Inside,
    OutsideLow,
    OutsideHigh,
}

/// Position of a coordinate relative to an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location<T> {
    /// Index of the lower breakpoint of the bracketing (or boundary) interval
    pub index: usize,
    /// Fractional offset within the interval; outside `[0, 1]` when extrapolating
    pub frac: T,
    pub extrap: Extrap,
}

impl<T> Location<T> {
    #[inline]
    pub fn in_range(&self) -> bool {
        self.extrap == Extrap::Inside
    }
}

/// An ordered sequence of strictly increasing breakpoints for one dimension.
/// The spacing between breakpoints may be uneven.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis<T: Float> {
    breakpoints: Vec<T>,
}

impl<T: Float> Axis<T> {
    /// Build an axis, checking every breakpoint.
    ///
    /// # Errors
    /// * `InvalidAxis` if there are fewer than 2 breakpoints
    /// * `InvalidAxis` if any breakpoint is not finite
    /// * `InvalidAxis` if the breakpoints are not strictly increasing
    pub fn new(breakpoints: Vec<T>) -> Result<Self, NdpError> {
        if breakpoints.len() < 2 {
            return Err(NdpError::InvalidAxis {
                reason: "axes must have at least 2 breakpoints",
            });
        }
        if breakpoints.iter().any(|b| !b.is_finite()) {
            return Err(NdpError::InvalidAxis {
                reason: "breakpoints must be finite",
            });
        }
        if breakpoints.windows(2).any(|w| w[1] <= w[0]) {
            return Err(NdpError::InvalidAxis {
                reason: "breakpoints must be strictly increasing",
            });
        }

        Ok(Self { breakpoints })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// Always false; an axis has at least 2 breakpoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    #[inline]
    pub fn breakpoints(&self) -> &[T] {
        &self.breakpoints
    }

    #[inline]
    pub fn first(&self) -> T {
        self.breakpoints[0]
    }

    #[inline]
    pub fn last(&self) -> T {
        self.breakpoints[self.breakpoints.len() - 1]
    }

    /// Whether `x` lies within `[first, last]`.
    #[inline]
    pub fn contains(&self, x: T) -> bool {
        x >= self.first() && x <= self.last()
    }

    /// Find the interval holding `x` and the fractional position inside it.
    ///
    /// The lower index is that of the largest breakpoint `<= x`, saturating to the
    /// first interval below the axis and to the last interval at or above the last
    /// breakpoint. A point exactly on the last breakpoint therefore lands on the last
    /// interval with `frac == 1`.
    #[inline]
    pub fn locate(&self, x: T) -> Location<T> {
        let n = self.breakpoints.len();

        // Bisection search; `0` if outside-low, `n` if at or above the last breakpoint
        let iloc = self.breakpoints.partition_point(|b| *b <= x) as isize - 1;
        let index = iloc.max(0).min(n as isize - 2) as usize;

        let extrap = match x {
            x if x < self.first() => Extrap::OutsideLow,
            x if x > self.last() => Extrap::OutsideHigh,
            _ => Extrap::Inside,
        };

        let x0 = self.breakpoints[index];
        let x1 = self.breakpoints[index + 1];
        let frac = (x - x0) / (x1 - x0);

        Location {
            index,
            frac,
            extrap,
        }
    }
}
