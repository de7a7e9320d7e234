//! Error taxonomy shared by grid construction and query evaluation.
use thiserror::Error;

/// Errors produced while building a grid or evaluating a query.
///
/// Construction errors (`InvalidAxis`, `GridSizeMismatch`, `MaskSizeMismatch`,
/// `NonFiniteValue`, `NoDefinedValues`) mean no grid was built. The remaining variants are local
/// to a single query; in batch evaluation they occupy that query's slot only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NdpError {
    #[error("invalid axis: {reason}")]
    InvalidAxis { reason: &'static str },

    #[error("grid size mismatch: axes span {expected} nodes but {got} values were given")]
    GridSizeMismatch { expected: usize, got: usize },

    #[error("definedness mask has {got} entries, expected {expected}")]
    MaskSizeMismatch { expected: usize, got: usize },

    #[error("grid node {index} is marked defined but holds a non-finite value")]
    NonFiniteValue { index: usize },

    #[error("grid has no defined values")]
    NoDefinedValues,

    #[error("dimension mismatch: grid has {expected} axes but query has {got} coordinates")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("query coordinate on axis {axis} is outside the grid and extrapolation is disabled")]
    OutOfBounds { axis: usize },

    #[error("query hypercube contains void nodes and imputation is disabled")]
    UndefinedRegion,

    #[error("query coordinate on axis {axis} is not finite")]
    NonFiniteQuery { axis: usize },

    #[error("batch evaluation was cancelled before this query was dispatched")]
    Cancelled,
}
