//! Training hyperparameters.
//!
//! [`GradientDescentConfig`] is fixed once a [`LinearRegressor`](crate::model::linear::LinearRegressor)
//! is constructed and stays constant for every training run on that instance.
//!
//! # Example
//!
//! ```rust
//! use linefit_rs::config::{GradientDescentConfig, TraceMode};
//!
//! let config = GradientDescentConfig::builder()
//!     .learning_rate(0.1)
//!     .iterations(500)
//!     .trace_mode(TraceMode::Resume)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.iterations, 500);
//! ```

use crate::error::{RegressionError, Result};

pub use crate::trainer::TraceMode;

/// Hyperparameters for batch gradient descent.
///
/// With the `serde` feature, missing fields fall back to [`Default`] values when
/// deserializing. Deserialized values are not checked until the config reaches
/// [`LinearRegressor::new`](crate::model::linear::LinearRegressor::new) or [`validate`](Self::validate).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GradientDescentConfig {
    /// Step size α. Must be positive and finite.
    pub learning_rate: f64,
    /// Number of descent iterations N.
    pub iterations: usize,
    /// Whether training clears or extends the existing cost history.
    pub trace_mode: TraceMode,
    /// Emit a progress `debug!` line every this many iterations. `0` disables it.
    pub log_every: usize,
}

impl Default for GradientDescentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            iterations: 1000,
            trace_mode: TraceMode::Reset,
            log_every: 100,
        }
    }
}

impl GradientDescentConfig {
    /// Creates a config with the given α and N, other fields at their defaults.
    ///
    /// Not validated; see [`validate`](Self::validate).
    pub fn new(learning_rate: f64, iterations: usize) -> Self {
        Self {
            learning_rate,
            iterations,
            ..Self::default()
        }
    }

    pub fn builder() -> GradientDescentConfigBuilder {
        GradientDescentConfigBuilder::new()
    }

    /// Checks that α is positive and finite.
    ///
    /// `iterations` is unsigned, so a negative count cannot be expressed.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() {
            return Err(RegressionError::InvalidConfiguration {
                parameter: "learning_rate",
                value: self.learning_rate,
                reason: "must be finite",
            });
        }
        if self.learning_rate <= 0.0 {
            return Err(RegressionError::InvalidConfiguration {
                parameter: "learning_rate",
                value: self.learning_rate,
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Fluent builder for [`GradientDescentConfig`].
///
/// Defaults:
/// - `learning_rate`: 0.01
/// - `iterations`: 1000
/// - `trace_mode`: [`TraceMode::Reset`]
/// - `log_every`: 100
#[derive(Debug, Clone, Default)]
pub struct GradientDescentConfigBuilder {
    config: GradientDescentConfig,
}

impl GradientDescentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn learning_rate(mut self, alpha: f64) -> Self {
        self.config.learning_rate = alpha;
        self
    }

    pub fn iterations(mut self, n: usize) -> Self {
        self.config.iterations = n;
        self
    }

    pub fn trace_mode(mut self, mode: TraceMode) -> Self {
        self.config.trace_mode = mode;
        self
    }

    /// Sets the progress logging interval. `0` turns progress lines off.
    pub fn log_every(mut self, every: usize) -> Self {
        self.config.log_every = every;
        self
    }

    /// Validates and returns the config.
    pub fn build(self) -> Result<GradientDescentConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
