use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::{Axis, Grid};

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers in `[0, 1)` using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// The 2D grid used throughout the tests: x = [0, 1, 2], y = [0, 1], z = x + 2y
pub fn grid_xy() -> Grid<f64> {
    Grid::from_fn(axes_xy(), |p| p[0] + 2.0 * p[1]).unwrap()
}

pub fn axes_xy() -> Vec<Axis<f64>> {
    vec![
        Axis::new(vec![0.0, 1.0, 2.0]).unwrap(),
        Axis::new(vec![0.0, 1.0]).unwrap(),
    ]
}

/// Same values as [`grid_xy`] with the given flat indices void, built with
/// either void encoding.
pub fn grid_xy_with_voids(voids: &[usize], masked: bool) -> Grid<f64> {
    let full = grid_xy();
    let mut vals = full.raw_values().to_vec();
    if masked {
        let mut defined = vec![true; vals.len()];
        for &i in voids {
            defined[i] = false;
            vals[i] = -1e300; // never read
        }
        Grid::with_mask(axes_xy(), vals, defined).unwrap()
    } else {
        for &i in voids {
            vals[i] = f64::NAN;
        }
        Grid::new(axes_xy(), vals).unwrap()
    }
}

/// Axes with uneven, randomly perturbed spacing
pub fn random_axes(rng: &mut StdRng, dims: &[usize]) -> Vec<Axis<f64>> {
    dims.iter()
        .enumerate()
        .map(|(i, &n)| {
            let mut x = crate::utils::linspace(-5.0 * (i as f64), 5.0 * ((i + 1) as f64), n);
            let dx = randn::<f64>(rng, n);
            (0..n).for_each(|k| x[k] += (dx[k] - 0.5) / 10.0);
            Axis::new(x).unwrap()
        })
        .collect()
}
