//! Location of the 2^ndims grid corners surrounding a query point.
//!
//! Corner `c` takes the upper node along axis `i` when bit `i` of `c` is set,
//! so the corners are visited by counting from `0` to `2^ndims - 1` with no recursion.
//!
//! References
//! * https://en.wikipedia.org/wiki/Bilinear_interpolation#Weighted_mean
use num_traits::Float;

use crate::{Extrap, Grid, NdpError};

/// Where a query point sits relative to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// The point coincides with a grid node
    OnGrid,
    /// The point is inside the grid and off-node
    Interpolated,
    /// The point is outside the grid on at least one axis
    Extrapolated,
}

/// The bracketing (or boundary-clamped) cell of a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypercube<T: Float> {
    /// Index of lower corner on each axis
    pub origin: Vec<usize>,

    /// Fractional offset of the query within each axis interval
    pub fracs: Vec<T>,

    /// Extrapolation flag on each axis
    pub extrap: Vec<Extrap>,

    /// Flat grid index of each corner
    pub corners: Vec<usize>,

    /// Value at each corner, `None` where the node is void
    pub values: Vec<Option<T>>,
}

impl<T: Float> Hypercube<T> {
    /// Locate the cell holding `point` and gather its corner values.
    ///
    /// # Errors
    /// * `DimensionMismatch` if `point.len() != grid.ndims()`
    /// * `NonFiniteQuery` if any coordinate is NaN or infinite
    pub fn locate(grid: &Grid<T>, point: &[T]) -> Result<Self, NdpError> {
        let ndims = grid.ndims();
        if point.len() != ndims {
            return Err(NdpError::DimensionMismatch {
                expected: ndims,
                got: point.len(),
            });
        }
        if let Some(axis) = point.iter().position(|x| !x.is_finite()) {
            return Err(NdpError::NonFiniteQuery { axis });
        }

        let mut origin = Vec::with_capacity(ndims);
        let mut fracs = Vec::with_capacity(ndims);
        let mut extrap = Vec::with_capacity(ndims);
        for (axis, &x) in grid.axes().iter().zip(point) {
            let loc = axis.locate(x);
            origin.push(loc.index);
            fracs.push(loc.frac);
            extrap.push(loc.extrap);
        }

        // Offset of the lower corner, then the stride to step to the upper node on each axis
        let base = grid.ravel(&origin);
        let strides = grid.strides();
        let nverts = 1_usize << ndims;
        let mut corners = Vec::with_capacity(nverts);
        let mut values = Vec::with_capacity(nverts);
        for c in 0..nverts {
            let mut k = base;
            for j in 0..ndims {
                if (c >> j) & 1 == 1 {
                    k += strides[j];
                }
            }
            corners.push(k);
            values.push(grid.value(k));
        }

        Ok(Self {
            origin,
            fracs,
            extrap,
            corners,
            values,
        })
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.origin.len()
    }

    /// Whether every axis is within the grid.
    #[inline]
    pub fn in_range(&self) -> bool {
        self.extrap.iter().all(|e| *e == Extrap::Inside)
    }

    /// Classify the query: extrapolated if outside on any axis, on-grid if every
    /// fraction is exactly 0 or 1, interpolated otherwise.
    pub fn classify(&self) -> Kind {
        if !self.in_range() {
            Kind::Extrapolated
        } else if self
            .fracs
            .iter()
            .all(|&f| f == T::zero() || f == T::one())
        {
            Kind::OnGrid
        } else {
            Kind::Interpolated
        }
    }

    /// Multilinear weight of corner `c`.
    #[inline]
    pub fn weight(&self, c: usize) -> T {
        let mut w = T::one();
        for j in 0..self.fracs.len() {
            let f = self.fracs[j];
            w = w * if (c >> j) & 1 == 1 { f } else { T::one() - f };
        }
        w
    }

    /// Whether corner `c` influences the result.
    ///
    /// A corner is ignored only when the query sits exactly on the opposite face
    /// along some axis, so a void node there never needs filling. This is decided
    /// per axis rather than from [`Hypercube::weight`], whose product can underflow
    /// to zero for small but nonzero fractions.
    #[inline]
    pub fn contributes(&self, c: usize) -> bool {
        self.fracs.iter().enumerate().all(|(j, &f)| {
            let upper = (c >> j) & 1 == 1;
            !((upper && f == T::zero()) || (!upper && f == T::one()))
        })
    }

    /// Corners that are void and carry weight.
    pub fn contributing_voids(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.values.len()).filter(move |&c| self.values[c].is_none() && self.contributes(c))
    }

    pub fn has_contributing_voids(&self) -> bool {
        self.contributing_voids().next().is_some()
    }
}

/// Check whether a list of points is inside the grid within some absolute tolerance.
///
/// Output slice entry `i` is set to `false` if no points on that dimension are out of bounds,
/// and set to `true` if there is a bounds violation on that axis.
///
/// # Errors
/// * `DimensionMismatch` if any point or the output slice does not have one entry per axis
pub fn check_bounds<T: Float, P: AsRef<[T]>>(
    grid: &Grid<T>,
    points: &[P],
    atol: T,
    out: &mut [bool],
) -> Result<(), NdpError> {
    let ndims = grid.ndims();
    if out.len() != ndims {
        return Err(NdpError::DimensionMismatch {
            expected: ndims,
            got: out.len(),
        });
    }
    out.iter_mut().for_each(|o| *o = false);
    for p in points {
        let p = p.as_ref();
        if p.len() != ndims {
            return Err(NdpError::DimensionMismatch {
                expected: ndims,
                got: p.len(),
            });
        }
        for i in 0..ndims {
            let axis = grid.axis(i);
            let (lo, hi) = (axis.first(), axis.last());
            let x = p[i];
            if (x - lo) <= -atol || (x - hi) >= atol {
                out[i] = true;
            }
        }
    }
    Ok(())
}
