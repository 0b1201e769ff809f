//! # linefit-rs
//!
//! Single-feature linear regression `f(x) = w·x + b`, trained by batch gradient
//! descent on halved mean squared error.
//!
//! ## Core Design Principles
//!
//! - **Pure and stateful variants kept apart**: gradients are computed from explicit
//!   `(w, b)` values; only the training loop writes to the model.
//! - **Simultaneous updates**: the optimizer returns new parameters from one snapshot,
//!   so a half-updated `(w, b)` is never observed.
//! - **Eager validation**: mismatched or empty inputs and bad hyperparameters are
//!   rejected before any state changes.
//!
//! ## Quick Start
//!
//! ```rust
//! use linefit_rs::LinearRegressor;
//!
//! let x = [1.0, 2.0];
//! let y = [2.0, 3.0]; // y = x + 1
//!
//! let mut model = LinearRegressor::with_hyperparameters(0.1, 5000).unwrap();
//! let params = model.gradient_descent(&x, &y).unwrap();
//!
//! assert!((params.weight - 1.0).abs() < 1e-3);
//! assert!((params.bias - 1.0).abs() < 1e-3);
//!
//! // Plain numeric sequences for whatever renders them.
//! let fitted: Vec<f64> = model.predict_batch(&x);
//! let trace: &[f64] = model.cost_history();
//! # assert_eq!(fitted.len(), 2);
//! # assert_eq!(trace.len(), 5000);
//! ```
//!
//! ## Module Structure
//!
//! - `model` — `LinearRegressor` and the line parameters
//! - `loss` — differentiable cost functions
//! - `optimizer` — parameter update rules
//! - `trainer` — history policy and per-iteration observers
//! - `dataset` — validated paired input
//! - `config` — training hyperparameters
//! - `error` — error taxonomy
//!
//! ## Logging
//!
//! Training reports progress through the [`log`] facade. Install any logger (e.g.
//! `env_logger`) to see it; nothing is printed otherwise.

/// Training hyperparameters.
pub mod config;

/// Validated `(x, y)` training data.
pub mod dataset;

/// Error types.
pub mod error;

/// Differentiable loss functions.
pub mod loss;

/// The regressor and its parameters.
pub mod model;

/// Gradient-based parameter updates.
pub mod optimizer;

/// Training-loop hooks.
pub mod trainer;

pub use config::{GradientDescentConfig, TraceMode};
pub use error::{RegressionError, Result};
pub use model::{Gradients, InferenceModel, LinearParams, LinearRegressor};
