//! Estimates for void grid nodes from their nearest defined neighbours.
//!
//! The search walks outward from the void node in index space, one radius at a time.
//! At radius `r` it first looks at the axis-aligned neighbours `r` steps away along a
//! single axis; if none of those is defined, it looks at the whole shell of nodes whose
//! largest per-axis offset is exactly `r`. The first radius with any defined node wins,
//! and the estimate is the mean of the defined nodes found there, summed in ascending
//! flat-index order.
//!
//! Only nodes defined in the grid itself are candidates; an estimate never feeds
//! another estimate, so results do not depend on which voids were filled first.
//!
//! ```rust
//! use ndpolator::{Axis, Grid, Imputer};
//!
//! let x = Axis::new(vec![0.0_f64, 1.0, 2.0]).unwrap();
//! let grid = Grid::new(vec![x], vec![1.0, f64::NAN, 3.0]).unwrap();
//!
//! // Both neighbours are one step away, so they are averaged
//! let imputer = Imputer::new(&grid);
//! assert_eq!(imputer.nearest_defined(1).unwrap(), 2.0);
//! ```
use num_traits::Float;
use tracing::{debug, trace};

use crate::{Grid, Hypercube, NdpError};

/// Nearest-neighbour imputation over a borrowed grid.
#[derive(Debug, Clone, Copy)]
pub struct Imputer<'a, T: Float> {
    grid: &'a Grid<T>,
}

impl<'a, T: Float> Imputer<'a, T> {
    pub fn new(grid: &'a Grid<T>) -> Self {
        Self { grid }
    }

    /// Estimate for the node at flat index `node`.
    ///
    /// Defined nodes return their own value.
    ///
    /// # Errors
    /// * `NoDefinedValues` if the grid has no defined node at all
    pub fn nearest_defined(&self, node: usize) -> Result<T, NdpError> {
        self.search(node).map(|(v, _)| v)
    }

    /// Fill every void corner of `hc` that carries weight.
    ///
    /// Returns `true` if any corner was filled.
    ///
    /// # Errors
    /// * `NoDefinedValues` if the grid has no defined node at all
    pub fn impute(&self, hc: &mut Hypercube<T>) -> Result<bool, NdpError> {
        let voids: Vec<usize> = hc.contributing_voids().collect();
        for &c in &voids {
            let node = hc.corners[c];
            let (v, radius) = self.search(node)?;
            if radius > 1 {
                debug!(node, radius, "void corner imputed from distant neighbours");
            }
            hc.values[c] = Some(v);
        }
        Ok(!voids.is_empty())
    }

    /// Returns the estimate and the radius it was found at.
    fn search(&self, node: usize) -> Result<(T, usize), NdpError> {
        if let Some(v) = self.grid.value(node) {
            return Ok((v, 0));
        }

        let ndims = self.grid.ndims();
        let dims = self.grid.dims();
        let mut loc = vec![0_usize; ndims];
        self.grid.unravel(node, &mut loc);

        // Farthest distance to a grid face on any axis; the shell at this radius
        // reaches every remaining node
        let rmax = (0..ndims)
            .map(|j| loc[j].max(dims[j] - 1 - loc[j]))
            .max()
            .unwrap_or(0);

        let mut found = Vec::new();
        for r in 1..=rmax {
            self.axis_neighbours(&loc, r, &mut found);
            if found.is_empty() {
                self.shell(&loc, r, &mut found);
            }
            if !found.is_empty() {
                found.sort_unstable();
                found.dedup();
                let v = self.mean(&found);
                trace!(node, radius = r, candidates = found.len(), "void imputed");
                return Ok((v, r));
            }
        }

        Err(NdpError::NoDefinedValues)
    }

    /// Defined nodes exactly `r` steps from `loc` along a single axis.
    fn axis_neighbours(&self, loc: &[usize], r: usize, found: &mut Vec<usize>) {
        let dims = self.grid.dims();
        let strides = self.grid.strides();
        let base = self.grid.ravel(loc);
        for j in 0..loc.len() {
            if loc[j] >= r {
                let k = base - r * strides[j];
                if self.grid.is_defined(k) {
                    found.push(k);
                }
            }
            if loc[j] + r < dims[j] {
                let k = base + r * strides[j];
                if self.grid.is_defined(k) {
                    found.push(k);
                }
            }
        }
    }

    /// Defined nodes whose largest per-axis offset from `loc` is exactly `r`.
    ///
    /// Visits the box `loc +/- r` clipped to the grid with an odometer over the
    /// per-axis ranges, skipping the interior of the box.
    fn shell(&self, loc: &[usize], r: usize, found: &mut Vec<usize>) {
        let ndims = loc.len();
        let dims = self.grid.dims();
        let lo: Vec<usize> = (0..ndims).map(|j| loc[j].saturating_sub(r)).collect();
        let hi: Vec<usize> = (0..ndims).map(|j| (loc[j] + r).min(dims[j] - 1)).collect();

        let mut cur = lo.clone();
        loop {
            let on_shell = (0..ndims).any(|j| cur[j].abs_diff(loc[j]) == r);
            if on_shell {
                let k = self.grid.ravel(&cur);
                if self.grid.is_defined(k) {
                    found.push(k);
                }
            }

            // Advance the odometer, last axis fastest
            let mut j = ndims;
            loop {
                if j == 0 {
                    return;
                }
                j -= 1;
                if cur[j] < hi[j] {
                    cur[j] += 1;
                    break;
                }
                cur[j] = lo[j];
            }
        }
    }

    /// Mean of defined nodes, summed in the order given.
    fn mean(&self, nodes: &[usize]) -> T {
        let vals = self.grid.raw_values();
        let mut acc = T::zero();
        for &k in nodes {
            acc = acc + vals[k];
        }
        // Node counts are far below the precision limit of any float type
        acc / T::from(nodes.len()).unwrap_or_else(T::one)
    }
}

impl<T: Float> Grid<T> {
    /// A copy of this grid with every void node replaced by its nearest-neighbour
    /// estimate. The input grid is left untouched.
    ///
    /// # Errors
    /// * `NoDefinedValues` if the grid has no defined node at all
    pub fn impute_voids(&self) -> Result<Grid<T>, NdpError> {
        let imputer = Imputer::new(self);
        let mut vals = self.raw_values().to_vec();
        let mut filled = 0_usize;
        for i in 0..vals.len() {
            if !self.is_defined(i) {
                vals[i] = imputer.nearest_defined(i)?;
                filled += 1;
            }
        }
        debug!(filled, "grid voids imputed");
        Ok(self.filled(vals))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;
    use crate::Axis;

    #[test]
    fn test_defined_node_returns_itself() {
        let grid = grid_xy();
        let imputer = Imputer::new(&grid);
        for i in 0..grid.len() {
            assert_eq!(imputer.nearest_defined(i).unwrap(), grid.raw_values()[i]);
        }
    }

    /// Node (1, 0) has axis neighbours (0, 0) = 0, (2, 0) = 2 and (1, 1) = 3
    #[test]
    fn test_axis_neighbours_averaged() {
        for masked in [false, true] {
            let grid = grid_xy_with_voids(&[2], masked);
            let v = Imputer::new(&grid).nearest_defined(2).unwrap();
            assert!((v - 5.0 / 3.0).abs() < 1e-15);
        }
    }

    /// When every axis neighbour is void the diagonal shell is used
    #[test]
    fn test_diagonal_fallback() {
        // Void (0, 0) and its axis neighbours (1, 0), (0, 1); (1, 1) = 3 is the diagonal
        for masked in [false, true] {
            let grid = grid_xy_with_voids(&[0, 1, 2], masked);
            let v = Imputer::new(&grid).nearest_defined(0).unwrap();
            assert_eq!(v, 3.0);
        }
    }

    /// Axis neighbours at radius 2 must not win over a diagonal at radius 1
    #[test]
    fn test_radius_before_axis_alignment() {
        let axes = vec![
            Axis::new(vec![0.0, 1.0, 2.0]).unwrap(),
            Axis::new(vec![0.0, 1.0, 2.0]).unwrap(),
        ];
        let nan = f64::NAN;
        #[rustfmt::skip]
        let vals = vec![
            nan, nan, 7.0,
            nan, 5.0, nan,
            9.0, nan, nan,
        ];
        let grid = Grid::new(axes, vals).unwrap();
        let v = Imputer::new(&grid).nearest_defined(0).unwrap();
        assert_eq!(v, 5.0);
    }

    #[test]
    fn test_escalates_across_grid() {
        let axes = vec![Axis::new(crate::utils::linspace(0.0, 1.0, 9)).unwrap()];
        let mut vals = vec![f64::NAN; 9];
        vals[8] = 4.0;
        let grid = Grid::new(axes, vals).unwrap();
        let imputer = Imputer::new(&grid);
        for i in 0..9 {
            assert_eq!(imputer.nearest_defined(i).unwrap(), 4.0);
        }
    }

    #[test]
    fn test_impute_hypercube() {
        let grid = grid_xy_with_voids(&[2], false);
        let mut hc = Hypercube::locate(&grid, &[0.5, 0.5]).unwrap();
        assert!(hc.has_contributing_voids());

        let imputed = Imputer::new(&grid).impute(&mut hc).unwrap();
        assert!(imputed);
        assert!(hc.values.iter().all(|v| v.is_some()));

        // Nothing left to fill
        assert!(!Imputer::new(&grid).impute(&mut hc).unwrap());
    }

    #[test]
    fn test_impute_voids_whole_grid() {
        let mut rng = rng_fixed_seed();
        let axes = random_axes(&mut rng, &[4, 5, 3]);
        let full = Grid::from_fn(axes.clone(), |p| p.iter().sum()).unwrap();

        let mut vals = full.raw_values().to_vec();
        let holes = randn::<f64>(&mut rng, vals.len());
        (0..vals.len()).for_each(|i| {
            if holes[i] < 0.4 && i != 0 {
                vals[i] = f64::NAN
            }
        });
        let holey = Grid::new(axes, vals).unwrap();
        let filled = holey.impute_voids().unwrap();

        assert_eq!(filled.void_count(), 0);
        assert!(filled.raw_values().iter().all(|v| v.is_finite()));
        // Defined nodes are untouched
        for i in 0..holey.len() {
            if let Some(v) = holey.value(i) {
                assert_eq!(filled.value(i), Some(v));
            }
        }
    }

    /// Imputation reads the same values whichever way voids are encoded
    #[test]
    fn test_encodings_impute_identically() {
        let voids = [1, 2, 5];
        let a = grid_xy_with_voids(&voids, false).impute_voids().unwrap();
        let b = grid_xy_with_voids(&voids, true).impute_voids().unwrap();
        assert_eq!(a.raw_values(), b.raw_values());
    }
}
