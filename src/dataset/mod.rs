//! Paired single-feature training data.
//!
//! A [`TrainingSet`] borrows caller-owned `x` and `y` slices and guarantees, once built,
//! that they are the same length and non-empty. Cost, gradient and training all go
//! through it, so the checks happen once and up front.
//!
//! # Example
//!
//! ```rust
//! use linefit_rs::dataset::TrainingSet;
//!
//! let x = [1.0, 2.0, 3.0];
//! let y = [2.0, 4.0, 6.0];
//! let set = TrainingSet::new(&x, &y).unwrap();
//! assert_eq!(set.len(), 3);
//! ```

use crate::error::{RegressionError, Result};

/// Validated, read-only view over `m >= 1` `(x_i, y_i)` pairs.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSet<'a> {
    x: &'a [f64],
    y: &'a [f64],
}

impl<'a> TrainingSet<'a> {
    /// Pairs `x` with `y`.
    ///
    /// # Errors
    /// - [`RegressionError::DimensionMismatch`] if the lengths differ
    /// - [`RegressionError::EmptyInput`] if both are empty
    pub fn new(x: &'a [f64], y: &'a [f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(RegressionError::DimensionMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if x.is_empty() {
            return Err(RegressionError::EmptyInput);
        }
        Ok(Self { x, y })
    }

    /// Number of samples `m`. Always at least 1.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn x(&self) -> &'a [f64] {
        self.x
    }

    pub fn y(&self) -> &'a [f64] {
        self.y
    }
}

#[cfg(feature = "ndarray")]
impl<'a> TrainingSet<'a> {
    /// Builds a training set from contiguous ndarray views.
    ///
    /// # Errors
    /// [`RegressionError::NonContiguous`] if either view is strided (call
    /// `as_standard_layout` on it first), otherwise the same as [`new`](Self::new).
    pub fn from_arrays(
        x: ndarray::ArrayView1<'a, f64>,
        y: ndarray::ArrayView1<'a, f64>,
    ) -> Result<Self> {
        let x = x.to_slice().ok_or(RegressionError::NonContiguous("x"))?;
        let y = y.to_slice().ok_or(RegressionError::NonContiguous("y"))?;
        Self::new(x, y)
    }
}
