//! Convenience methods for constructing grids and query points in a way that echoes,
//! but does not exactly match, methods common in scripting languages.
use itertools::Itertools;
use num_traits::Float;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
///
/// `n == 0` gives an empty vec and `n == 1` gives `[start]`.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    if n < 2 {
        return vec![start; n];
    }
    let dx: T = (stop - start) / T::from(n - 1).unwrap_or_else(T::one);
    (0..n)
        .map(|i| start + T::from(i).unwrap_or_else(T::nan) * dx)
        .collect()
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn),
/// one point per entry. The result lines up with a grid's flat value buffer, and
/// can be passed straight to the batch evaluators as a list of points.
pub fn meshgrid<T>(x: Vec<&Vec<T>>) -> Vec<Vec<T>>
where
    T: Float,
{
    x.into_iter()
        .multi_cartesian_product()
        .map(|xx| xx.iter().map(|y| **y).collect())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0_f64, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_linspace_short() {
        assert!(linspace(0.0_f64, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0_f64, 1.0, 1), vec![3.0]);
    }

    #[test]
    fn test_meshgrid_c_order() {
        let x = vec![0.0_f64, 1.0];
        let y = vec![5.0_f64, 6.0, 7.0];
        let m = meshgrid(vec![&x, &y]);
        assert_eq!(m.len(), 6);
        assert_eq!(m[0], vec![0.0, 5.0]);
        assert_eq!(m[1], vec![0.0, 6.0]);
        assert_eq!(m[3], vec![1.0, 5.0]);
    }
}
