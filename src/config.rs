//! Evaluation policies for out-of-range queries and void nodes.
//!
//! ```rust
//! use ndpolator::{Config, Extrapolation, Imputation};
//!
//! let config = Config::default()
//!     .extrapolation(Extrapolation::Disabled)
//!     .imputation(Imputation::Nearest);
//! assert_eq!(config.extrapolation, Extrapolation::Disabled);
//! ```

/// What to do with a query outside the grid on any axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation {
    /// Fail the query with `OutOfBounds`.
    Disabled,
    /// Continue the boundary cell's gradient.
    #[default]
    Linear,
    /// Hold the value at the nearest point of the grid's domain.
    Nearest,
}

/// What to do with a hypercube that has void corners carrying weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Imputation {
    /// Fail the query with `UndefinedRegion`.
    Disabled,
    /// Fill each void corner from its nearest defined neighbours.
    #[default]
    Nearest,
}

/// Evaluation policies. Defaults to linear extrapolation and nearest-neighbour imputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    pub extrapolation: Extrapolation,
    pub imputation: Imputation,
}

impl Config {
    pub fn new(extrapolation: Extrapolation, imputation: Imputation) -> Self {
        Self {
            extrapolation,
            imputation,
        }
    }

    /// Strict evaluation: no extrapolation and no imputation.
    pub fn strict() -> Self {
        Self::new(Extrapolation::Disabled, Imputation::Disabled)
    }

    /// Sets the extrapolation policy.
    pub fn extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Sets the imputation policy.
    pub fn imputation(mut self, imputation: Imputation) -> Self {
        self.imputation = imputation;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extrapolation, Extrapolation::Linear);
        assert_eq!(config.imputation, Imputation::Nearest);

        let strict = Config::strict();
        assert_eq!(
            strict,
            Config::default()
                .extrapolation(Extrapolation::Disabled)
                .imputation(Imputation::Disabled)
        );
    }
}
