//! Rectilinear grid of sampled values, possibly with void nodes.
//!
//! Values are stored in a flat buffer in C-style ordering
//! (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...), so the flat index of a node
//! is the mixed-radix encoding of its per-axis indices with the last axis varying fastest.
//!
//! Void nodes can be marked in one of two ways:
//! * [`Grid::new`] treats NaN entries of the value buffer as void.
//! * [`Grid::with_mask`] takes a separate definedness mask; the stored value at a
//!   masked-out node is never read.
//!
//! ```rust
//! use ndpolator::{Axis, Grid};
//!
//! let x = Axis::new(vec![0.0_f64, 1.0, 2.0]).unwrap();
//! let y = Axis::new(vec![0.0_f64, 1.0]).unwrap();
//!
//! // z = x + 2y, with (1, 0) missing
//! let z = vec![0.0, 2.0, f64::NAN, 3.0, 2.0, 4.0];
//! let grid = Grid::new(vec![x, y], z).unwrap();
//!
//! assert_eq!(grid.value(grid.ravel(&[2, 1])), Some(4.0));
//! assert_eq!(grid.value(grid.ravel(&[1, 0])), None);
//! assert_eq!(grid.void_count(), 1);
//! ```
use num_traits::Float;
use tracing::debug;

use crate::{Axis, NdpError};

/// How void nodes are recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Voids {
    /// NaN in the value buffer marks a void node
    Sentinel,
    /// `defined[i] == false` marks node `i` as void
    Mask(Vec<bool>),
}

/// An N-dimensional rectilinear grid with a value (or void) at every node.
///
/// A grid is immutable once built and can be shared across threads for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Float> {
    axes: Vec<Axis<T>>,

    /// Size of each dimension
    dims: Vec<usize>,

    /// Cumulative products of higher dimensions, used for indexing
    strides: Vec<usize>,

    /// Values at each point, size prod(dims)
    vals: Vec<T>,

    voids: Voids,
}

impl<T: Float> Grid<T> {
    /// Build a grid where NaN values mark void nodes.
    ///
    /// # Errors
    /// * `InvalidAxis` if no axes are given
    /// * `GridSizeMismatch` if `vals.len()` is not the product of the axis lengths
    /// * `NonFiniteValue` if any value is infinite
    /// * `NoDefinedValues` if every value is NaN
    pub fn new(axes: Vec<Axis<T>>, vals: Vec<T>) -> Result<Self, NdpError> {
        Self::build(axes, vals, Voids::Sentinel)
    }

    /// Build a grid with an explicit definedness mask alongside the values.
    ///
    /// # Errors
    /// * `InvalidAxis` if no axes are given
    /// * `GridSizeMismatch` if `vals.len()` is not the product of the axis lengths
    /// * `MaskSizeMismatch` if `defined.len() != vals.len()`
    /// * `NonFiniteValue` if a node marked defined holds NaN or infinity
    /// * `NoDefinedValues` if no node is marked defined
    pub fn with_mask(
        axes: Vec<Axis<T>>,
        vals: Vec<T>,
        defined: Vec<bool>,
    ) -> Result<Self, NdpError> {
        if defined.len() != vals.len() {
            return Err(NdpError::MaskSizeMismatch {
                expected: vals.len(),
                got: defined.len(),
            });
        }
        Self::build(axes, vals, Voids::Mask(defined))
    }

    /// Build a fully-defined grid by sampling `f` at every node.
    ///
    /// `f` receives the coordinates of the node, one per axis.
    pub fn from_fn<F>(axes: Vec<Axis<T>>, mut f: F) -> Result<Self, NdpError>
    where
        F: FnMut(&[T]) -> T,
    {
        if axes.is_empty() {
            return Err(NdpError::InvalidAxis {
                reason: "grid must have at least one axis",
            });
        }
        let nvals: usize = axes.iter().map(|a| a.len()).product();
        let mut coords = vec![T::zero(); axes.len()];
        let mut loc = vec![0_usize; axes.len()];
        let mut vals = Vec::with_capacity(nvals);
        for i in 0..nvals {
            unravel_into(i, &axes, &mut loc);
            for j in 0..axes.len() {
                coords[j] = axes[j].breakpoints()[loc[j]];
            }
            vals.push(f(&coords));
        }
        Self::new(axes, vals)
    }

    fn build(axes: Vec<Axis<T>>, vals: Vec<T>, voids: Voids) -> Result<Self, NdpError> {
        let ndims = axes.len();
        if ndims == 0 {
            return Err(NdpError::InvalidAxis {
                reason: "grid must have at least one axis",
            });
        }

        let dims: Vec<usize> = axes.iter().map(|a| a.len()).collect();
        let nvals: usize = dims.iter().product();
        if vals.len() != nvals {
            return Err(NdpError::GridSizeMismatch {
                expected: nvals,
                got: vals.len(),
            });
        }

        // Each entry is the cumulative product of the size of dimensions
        // higher than this one, which is the stride between blocks
        // relating to a given index along each dimension.
        let mut strides = vec![1_usize; ndims];
        let mut acc = 1;
        for i in (0..ndims).rev() {
            strides[i] = acc;
            acc *= dims[i];
        }

        let grid = Self {
            axes,
            dims,
            strides,
            vals,
            voids,
        };

        // A defined node must hold a real number
        if let Some(index) = (0..nvals).find(|&i| grid.is_defined(i) && !grid.vals[i].is_finite()) {
            return Err(NdpError::NonFiniteValue { index });
        }

        let voids = grid.void_count();
        if voids == nvals {
            return Err(NdpError::NoDefinedValues);
        }
        debug!(
            ndims,
            nodes = nvals,
            voids,
            masked = matches!(grid.voids, Voids::Mask(_)),
            "grid built"
        );

        Ok(grid)
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn axes(&self) -> &[Axis<T>] {
        &self.axes
    }

    #[inline]
    pub fn axis(&self, dim: usize) -> &Axis<T> {
        &self.axes[dim]
    }

    /// Number of breakpoints on each axis
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Total number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    /// Always false for a constructed grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    /// Raw value buffer. Entries at void nodes are NaN for sentinel grids and
    /// arbitrary for masked grids.
    #[inline]
    pub fn raw_values(&self) -> &[T] {
        &self.vals
    }

    #[inline]
    pub fn voids(&self) -> &Voids {
        &self.voids
    }

    /// Whether the node at flat index `i` carries a value.
    #[inline]
    pub fn is_defined(&self, i: usize) -> bool {
        match &self.voids {
            Voids::Sentinel => !self.vals[i].is_nan(),
            Voids::Mask(defined) => defined[i],
        }
    }

    /// Value at flat index `i`, or `None` for a void node.
    #[inline]
    pub fn value(&self, i: usize) -> Option<T> {
        if self.is_defined(i) {
            Some(self.vals[i])
        } else {
            None
        }
    }

    pub fn void_count(&self) -> usize {
        (0..self.vals.len()).filter(|&i| !self.is_defined(i)).count()
    }

    /// Flat index of a node from its per-axis indices.
    #[inline]
    pub fn ravel(&self, loc: &[usize]) -> usize {
        let mut i = 0;
        for j in 0..self.strides.len() {
            i += loc[j] * self.strides[j];
        }
        i
    }

    /// Per-axis indices of the node at flat index `i`, written to `loc`.
    #[inline]
    pub fn unravel(&self, i: usize, loc: &mut [usize]) {
        let mut rem = i;
        for j in 0..self.strides.len() {
            loc[j] = rem / self.strides[j];
            rem %= self.strides[j];
        }
    }

    /// Coordinates of the node at flat index `i`.
    pub fn coordinates(&self, i: usize) -> Vec<T> {
        let mut loc = vec![0_usize; self.ndims()];
        self.unravel(i, &mut loc);
        (0..self.ndims())
            .map(|j| self.axes[j].breakpoints()[loc[j]])
            .collect()
    }

    /// Copy of this grid with every node defined and holding `vals`.
    pub(crate) fn filled(&self, vals: Vec<T>) -> Self {
        let voids = match self.voids {
            Voids::Sentinel => Voids::Sentinel,
            Voids::Mask(_) => Voids::Mask(vec![true; vals.len()]),
        };
        Self {
            axes: self.axes.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            vals,
            voids,
        }
    }
}

/// Unravel a flat index against a list of axes without a grid in hand.
fn unravel_into<T: Float>(i: usize, axes: &[Axis<T>], loc: &mut [usize]) {
    let mut rem = i;
    for j in (0..axes.len()).rev() {
        let n = axes[j].len();
        loc[j] = rem % n;
        rem /= n;
    }
}
