//! Training-loop hooks: cost history policy and per-iteration observers.
//!
//! The loop itself lives in
//! [`LinearRegressor::gradient_descent_with`](crate::model::linear::LinearRegressor::gradient_descent_with).
//! This module holds what a caller plugs into it.

use std::ops::ControlFlow;

use crate::model::{Gradients, LinearParams};

/// What happens to an existing cost history when training starts again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TraceMode {
    /// Clear the history, so it holds exactly this run's costs.
    #[default]
    Reset,
    /// Append this run's costs after the ones already recorded.
    Resume,
}

/// Snapshot handed to a [`TrainingObserver`] after an iteration has been committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    /// Zero-based index within the current run.
    pub iteration: usize,
    /// Parameters after this iteration's update.
    pub params: LinearParams,
    /// Gradients that produced the update.
    pub gradients: Gradients,
    /// Cost under `params`; the value just appended to the history.
    pub cost: f64,
}

/// Result of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOutcome {
    pub params: LinearParams,
    /// Iterations completed in this run.
    pub iterations: usize,
    /// `true` if an observer stopped the run before the configured count.
    pub stopped_early: bool,
}

/// Called once per committed iteration.
///
/// Returning [`ControlFlow::Break`] stops training before the next iteration starts. The
/// parameters and cost history accumulated so far are kept.
///
/// Any `FnMut(&IterationReport) -> ControlFlow<()>` is an observer.
pub trait TrainingObserver {
    fn on_iteration(&mut self, report: &IterationReport) -> ControlFlow<()>;
}

impl<F> TrainingObserver for F
where
    F: FnMut(&IterationReport) -> ControlFlow<()>,
{
    fn on_iteration(&mut self, report: &IterationReport) -> ControlFlow<()> {
        self(report)
    }
}

/// Observer that never stops training.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunToCompletion;

impl TrainingObserver for RunToCompletion {
    fn on_iteration(&mut self, _report: &IterationReport) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
