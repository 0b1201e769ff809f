//! Error types for regression operations.

/// Errors raised by cost, gradient and training operations.
///
/// Every variant is detected before any model state is touched, so a failed call
/// leaves the regressor exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegressionError {
    /// `x` and `y` have different lengths.
    #[error("dimension mismatch: x has {x_len} samples, y has {y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },

    /// The training set has no samples.
    #[error("empty input: at least one (x, y) pair is required")]
    EmptyInput,

    /// A hyperparameter is outside its valid range.
    #[error("invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfiguration {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// An ndarray view is not in standard contiguous layout.
    #[cfg(feature = "ndarray")]
    #[error("non-contiguous input: {0} must be a standard-layout array")]
    NonContiguous(&'static str),
}

pub type Result<T> = std::result::Result<T, RegressionError>;
