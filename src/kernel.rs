//! Multilinear blending of a fully-defined hypercube.
//!
//! Each of the 2^ndims corners contributes its value times the product over axes of
//! `f` (upper node) or `1 - f` (lower node). The blend is affine in each fraction, so
//! feeding fractions outside `[0, 1]` continues the boundary cell's gradient and no
//! separate extrapolation formula is needed.
//!
//! ```rust
//! use ndpolator::kernel::multilinear;
//!
//! // Corners of the unit square, bit 0 along x and bit 1 along y
//! let vals = [0.0_f64, 1.0, 2.0, 3.0]; // z = x + 2y
//! assert_eq!(multilinear(&vals, &[0.5, 0.5]), 1.5);
//! assert_eq!(multilinear(&vals, &[2.0, 0.0]), 2.0);
//! ```
//!
//! References
//! * https://en.wikipedia.org/wiki/Bilinear_interpolation#Weighted_mean
use num_traits::Float;

/// Blend `2^fracs.len()` corner values with multilinear weights.
///
/// Corner `c` sits at the upper node of axis `j` when bit `j` of `c` is set.
///
/// # Panics
/// * If `vals.len() != 2^fracs.len()`
#[inline]
pub fn multilinear<T: Float>(vals: &[T], fracs: &[T]) -> T {
    let ndims = fracs.len();
    let nverts = 1_usize << ndims;
    assert_eq!(vals.len(), nverts, "Dimension mismatch");

    let mut interped = T::zero();
    for c in 0..nverts {
        let mut w = T::one();
        for j in 0..ndims {
            let f = fracs[j];
            w = w * if (c >> j) & 1 == 1 { f } else { T::one() - f };
        }
        interped = interped + vals[c] * w;
    }

    interped
}

/// Blend by repeated linear interpolation, collapsing one axis per pass.
///
/// Equivalent to [`multilinear`] up to rounding, but exact in two cases the weighted
/// sum is not: a hypercube whose corners all agree returns that value, and a
/// fraction of exactly 0 or 1 returns the node value untouched.
/// `vals` is used as working storage and is overwritten.
///
/// # Panics
/// * If `vals.len() != 2^fracs.len()`
#[inline]
pub fn multilinear_collapse<T: Float>(vals: &mut [T], fracs: &[T]) -> T {
    let ndims = fracs.len();
    let nverts = 1_usize << ndims;
    assert_eq!(vals.len(), nverts, "Dimension mismatch");

    // Axis 0 is the lowest bit, so adjacent pairs differ only along the current axis
    let mut n = nverts;
    for j in 0..ndims {
        let t = fracs[j];
        n /= 2;
        for i in 0..n {
            let y0 = vals[2 * i];
            let y1 = vals[2 * i + 1];
            // Exact node values on cell faces
            vals[i] = if t == T::zero() {
                y0
            } else if t == T::one() {
                y1
            } else {
                y0 + t * (y1 - y0)
            };
        }
    }

    vals[0]
}

/// Clamp fractions into `[0, 1]`, holding the boundary value outside the grid.
#[inline]
pub fn clamp_fracs<T: Float>(fracs: &mut [T]) {
    for f in fracs.iter_mut() {
        *f = f.max(T::zero()).min(T::one());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;

    #[test]
    fn test_1d_linear() {
        let vals = [1.0_f64, 3.0];
        assert_eq!(multilinear(&vals, &[0.0]), 1.0);
        assert_eq!(multilinear(&vals, &[1.0]), 3.0);
        assert_eq!(multilinear(&vals, &[0.25]), 1.5);
        // Extrapolation continues the slope
        assert_eq!(multilinear(&vals, &[-1.0]), -1.0);
        assert_eq!(multilinear(&vals, &[2.0]), 5.0);
    }

    /// Sum of coordinates is linear in every direction, so the blend must be exact
    /// at any fraction in any number of dimensions.
    #[test]
    fn test_affine_exact_1d_to_8d() {
        let mut rng = rng_fixed_seed();
        for ndims in 1..=8 {
            let nverts = 1 << ndims;
            let coefs = randn::<f64>(&mut rng, ndims);
            let vals: Vec<f64> = (0..nverts)
                .map(|c| (0..ndims).map(|j| coefs[j] * ((c >> j) & 1) as f64).sum::<f64>() + 0.5)
                .collect();

            for _ in 0..20 {
                // Fractions well outside [0, 1]
                let fracs: Vec<f64> = randn::<f64>(&mut rng, ndims)
                    .iter()
                    .map(|r| 3.0 * r - 1.0)
                    .collect();
                let expected: f64 = (0..ndims).map(|j| coefs[j] * fracs[j]).sum::<f64>() + 0.5;

                let mut scratch = vals.clone();
                assert!((multilinear(&vals, &fracs) - expected).abs() < 1e-9);
                assert!((multilinear_collapse(&mut scratch, &fracs) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_constant_corners() {
        let mut rng = rng_fixed_seed();
        for ndims in 1..=6 {
            let nverts = 1 << ndims;
            for _ in 0..10 {
                let mut vals = vec![-3.25_f64; nverts];
                let fracs: Vec<f64> = randn::<f64>(&mut rng, ndims)
                    .iter()
                    .map(|r| 10.0 * r - 5.0)
                    .collect();
                assert_eq!(multilinear_collapse(&mut vals, &fracs), -3.25);
            }
        }
    }

    #[test]
    fn test_collapse_exact_on_faces() {
        let vals = [0.1_f64, 0.3, 0.7, f64::NAN];
        assert_eq!(multilinear_collapse(&mut vals.clone(), &[1.0, 0.0]), 0.3);
        assert_eq!(multilinear_collapse(&mut vals.clone(), &[0.0, 1.0]), 0.7);
    }

    #[test]
    fn test_clamp_fracs() {
        let mut fracs = [-0.5_f64, 0.25, 1.5];
        clamp_fracs(&mut fracs);
        assert_eq!(fracs, [0.0, 0.25, 1.0]);
    }

    #[test]
    #[should_panic]
    fn test_wrong_corner_count() {
        multilinear(&[1.0_f64, 2.0, 3.0], &[0.5, 0.5]);
    }
}
