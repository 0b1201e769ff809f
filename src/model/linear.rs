use std::ops::ControlFlow;

use log::{debug, info, warn};

use crate::config::GradientDescentConfig;
use crate::dataset::TrainingSet;
use crate::error::Result;
use crate::loss::{HalfMSELoss, Loss};
use crate::model::{Gradients, InferenceModel, LinearParams};
use crate::optimizer::{Optimizer, SGD};
use crate::trainer::{
    IterationReport, RunToCompletion, TraceMode, TrainingObserver, TrainingOutcome,
};

/// Single-feature linear regression `f(x) = weight * x + bias`, fitted by batch
/// gradient descent on halved mean squared error.
///
/// A new regressor starts at `(0.0, 0.0)` with an empty cost history and a cost of
/// `+∞`, meaning "not evaluated yet". It can be trained, queried and retrained freely.
///
/// # Example
///
/// ```rust
/// use linefit_rs::model::linear::LinearRegressor;
///
/// let mut model = LinearRegressor::with_hyperparameters(0.1, 1000).unwrap();
/// let params = model.gradient_descent(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
///
/// assert!((params.weight - 1.0).abs() < 1e-2);
/// assert_eq!(model.cost_history().len(), 1000);
/// assert!((model.predict(4.0) - 4.0).abs() < 1e-1);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    params: LinearParams,
    cost: f64,
    cost_history: Vec<f64>,
    config: GradientDescentConfig,
    loss: HalfMSELoss,
    optimizer: SGD,
}

impl Default for LinearRegressor {
    /// α = 0.01, N = 1000.
    fn default() -> Self {
        Self::from_valid_config(GradientDescentConfig::default())
    }
}

impl LinearRegressor {
    /// Creates an untrained regressor.
    ///
    /// # Errors
    /// [`RegressionError::InvalidConfiguration`](crate::error::RegressionError::InvalidConfiguration)
    /// if the learning rate is not positive and finite.
    pub fn new(config: GradientDescentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Shorthand for `new(GradientDescentConfig::new(alpha, iterations))`.
    pub fn with_hyperparameters(alpha: f64, iterations: usize) -> Result<Self> {
        Self::new(GradientDescentConfig::new(alpha, iterations))
    }

    fn from_valid_config(config: GradientDescentConfig) -> Self {
        Self {
            params: LinearParams::default(),
            cost: f64::INFINITY,
            cost_history: Vec::new(),
            optimizer: SGD::new(config.learning_rate),
            loss: HalfMSELoss,
            config,
        }
    }

    pub fn weight(&self) -> f64 {
        self.params.weight
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }

    pub fn params(&self) -> LinearParams {
        self.params
    }

    /// Cost from the most recent evaluation; `+∞` if none happened yet.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Costs recorded by training, one per iteration, oldest first.
    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    pub fn config(&self) -> &GradientDescentConfig {
        &self.config
    }

    /// Overrides the current parameters, e.g. to warm-start training.
    ///
    /// The stored cost is reset to `+∞` since it no longer matches the line.
    pub fn set_params(&mut self, params: LinearParams) {
        self.params = params;
        self.cost = f64::INFINITY;
    }

    /// Returns to the freshly constructed state, keeping the configuration.
    pub fn reset(&mut self) {
        self.params = LinearParams::default();
        self.cost = f64::INFINITY;
        self.cost_history.clear();
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.params.predict_one(x)
    }

    pub fn predict_batch(&self, xs: &[f64]) -> Vec<f64> {
        self.params.predict_batch(xs)
    }

    #[cfg(feature = "ndarray")]
    pub fn predict_array(&self, xs: ndarray::ArrayView1<'_, f64>) -> ndarray::Array1<f64> {
        xs.mapv(|x| self.params.predict_one(x))
    }

    /// Evaluates `(1 / 2m) * Σ(f(x_i) - y_i)^2` with the current parameters and stores it
    /// as [`cost`](Self::cost).
    ///
    /// # Errors
    /// `DimensionMismatch` if `x.len() != y.len()`, `EmptyInput` if both are empty.
    pub fn compute_cost(&mut self, x: &[f64], y: &[f64]) -> Result<f64> {
        let data = TrainingSet::new(x, y)?;
        self.cost = self.cost_on(&data, self.params);
        Ok(self.cost)
    }

    /// Gradient of the cost at an arbitrary `(weight, bias)`.
    ///
    /// Reads nothing from the regressor's own parameters and mutates nothing.
    ///
    /// # Errors
    /// Same as [`compute_cost`](Self::compute_cost).
    pub fn compute_gradient(
        &self,
        x: &[f64],
        y: &[f64],
        weight: f64,
        bias: f64,
    ) -> Result<Gradients> {
        let data = TrainingSet::new(x, y)?;
        Ok(self.gradient_on(&data, LinearParams::new(weight, bias)))
    }

    /// Runs `config.iterations` steps of batch gradient descent from the current
    /// parameters and returns the final ones.
    ///
    /// Each step computes both gradients from the same snapshot, commits the updated
    /// parameters, then appends the cost under them to the history. Inputs are
    /// validated before anything is mutated.
    pub fn gradient_descent(&mut self, x: &[f64], y: &[f64]) -> Result<LinearParams> {
        self.gradient_descent_with(x, y, &mut RunToCompletion)
            .map(|outcome| outcome.params)
    }

    /// [`gradient_descent`](Self::gradient_descent) with an observer called after every
    /// committed iteration. The observer can stop training early; whatever parameters
    /// and history have accumulated by then are kept.
    pub fn gradient_descent_with<O>(
        &mut self,
        x: &[f64],
        y: &[f64],
        observer: &mut O,
    ) -> Result<TrainingOutcome>
    where
        O: TrainingObserver + ?Sized,
    {
        let data = TrainingSet::new(x, y)?;
        let iterations = self.config.iterations;
        let log_every = self.config.log_every;

        info!(
            "gradient descent: m={}, alpha={}, iterations={}, trace={:?}, start w={}, b={}",
            data.len(),
            self.optimizer.learning_rate(),
            iterations,
            self.config.trace_mode,
            self.params.weight,
            self.params.bias,
        );

        if self.config.trace_mode == TraceMode::Reset {
            self.cost_history.clear();
        }
        // `iterations` may be far larger than what an observer lets run.
        self.cost_history.reserve(iterations.min(1 << 16));

        let mut params = self.params;
        let mut completed = 0;
        let mut stopped_early = false;
        let mut warned_non_finite = false;

        for iteration in 0..iterations {
            let gradients = self.gradient_on(&data, params);
            params = self.optimizer.step(&params, &gradients);
            self.params = params;

            let cost = self.cost_on(&data, params);
            self.cost = cost;
            self.cost_history.push(cost);
            completed += 1;

            if !cost.is_finite() && !warned_non_finite {
                warn!(
                    "cost became non-finite at iteration {iteration} (alpha={} is likely too large)",
                    self.optimizer.learning_rate()
                );
                warned_non_finite = true;
            }
            if log_every > 0 && (iteration + 1) % log_every == 0 {
                debug!(
                    "iteration {:>6}: cost={:.6e}, w={:.6}, b={:.6}, dw={:.3e}, db={:.3e}",
                    iteration + 1,
                    cost,
                    params.weight,
                    params.bias,
                    gradients.dw,
                    gradients.db,
                );
            }

            let report = IterationReport {
                iteration,
                params,
                gradients,
                cost,
            };
            if let ControlFlow::Break(()) = observer.on_iteration(&report) {
                info!("training stopped by observer after {completed}/{iterations} iterations");
                stopped_early = true;
                break;
            }
        }

        info!(
            "gradient descent finished: w={}, b={}, cost={}",
            params.weight, params.bias, self.cost
        );

        Ok(TrainingOutcome {
            params,
            iterations: completed,
            stopped_early,
        })
    }

    fn cost_on(&self, data: &TrainingSet<'_>, params: LinearParams) -> f64 {
        let preds = params.forward(data);
        self.loss.cost(&preds, data.y())
    }

    fn gradient_on(&self, data: &TrainingSet<'_>, params: LinearParams) -> Gradients {
        let preds = params.forward(data);
        let grad_preds = self.loss.grad_wrt_prediction(&preds, data.y());
        params.backward(data, &grad_preds)
    }
}

impl InferenceModel for LinearRegressor {
    type InputSingle = f64;
    type OutputSingle = f64;
    type InputBatch = [f64];
    type OutputBatch = Vec<f64>;

    fn predict(&self, x: f64) -> f64 {
        self.params.predict_one(x)
    }

    fn predict_batch(&self, xs: &[f64]) -> Vec<f64> {
        self.params.predict_batch(xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegressionError;
    use approx::assert_abs_diff_eq;

    fn model(alpha: f64, iterations: usize) -> LinearRegressor {
        LinearRegressor::with_hyperparameters(alpha, iterations).unwrap()
    }

    fn cost_by_hand(params: LinearParams, x: &[f64], y: &[f64]) -> f64 {
        let sum_sq: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (params.weight * xi + params.bias - yi).powi(2))
            .sum();
        sum_sq / (2.0 * x.len() as f64)
    }

    // === Construction ===

    #[test]
    fn test_new_initial_state() {
        let m = model(0.1, 10);

        assert_eq!(m.weight(), 0.0);
        assert_eq!(m.bias(), 0.0);
        assert_eq!(m.cost(), f64::INFINITY);
        assert!(m.cost_history().is_empty());
        assert_eq!(m.config().learning_rate, 0.1);
        assert_eq!(m.config().iterations, 10);
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let mut a = model(0.1, 50);
        let b = model(0.1, 50);
        a.gradient_descent(&[1.0, 2.0], &[2.0, 4.0]).unwrap();

        assert_eq!(a.cost_history().len(), 50);
        assert!(b.cost_history().is_empty());
        assert_eq!(b.params(), LinearParams::default());
    }

    #[test]
    fn test_new_rejects_bad_learning_rate() {
        let err = LinearRegressor::with_hyperparameters(0.0, 10).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidConfiguration { value, .. } if value == 0.0));
        assert!(LinearRegressor::with_hyperparameters(-1.0, 10).is_err());
    }

    #[test]
    fn test_default() {
        let m = LinearRegressor::default();
        assert_eq!(*m.config(), GradientDescentConfig::default());
    }

    // === Prediction ===

    #[test]
    fn test_predict() {
        let mut m = model(0.1, 0);
        m.set_params(LinearParams::new(2.0, 0.5));

        assert_abs_diff_eq!(m.predict(3.0), 6.5);
        assert_eq!(m.predict_batch(&[0.0, 1.0, -1.0]), vec![0.5, 2.5, -1.5]);
    }

    #[test]
    fn test_predict_through_trait() {
        fn predict_generic<M: InferenceModel<InputSingle = f64, OutputSingle = f64>>(
            m: &M,
            x: f64,
        ) -> f64 {
            m.predict(x)
        }
        let mut m = model(0.1, 0);
        m.set_params(LinearParams::new(-1.0, 4.0));
        assert_eq!(predict_generic(&m, 2.0), 2.0);
    }

    // === Cost ===

    #[test]
    fn test_compute_cost_stores_value() {
        let mut m = model(0.1, 0);
        // w = b = 0: (1 + 4 + 9) / 6
        let cost = m.compute_cost(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();

        assert_abs_diff_eq!(cost, 14.0 / 6.0, epsilon = 1e-12);
        assert_eq!(m.cost(), cost);
    }

    #[test]
    fn test_compute_cost_zero_on_perfect_fit() {
        let mut m = model(0.1, 0);
        m.set_params(LinearParams::new(2.0, 1.0));
        let cost = m.compute_cost(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_compute_cost_non_negative() {
        let mut m = model(0.1, 0);
        m.set_params(LinearParams::new(-3.0, 7.0));
        let cost = m.compute_cost(&[0.3, -2.0, 5.5, 1.0], &[4.0, 0.0, -1.0, 9.0]).unwrap();
        assert!(cost > 0.0);
    }

    #[test]
    fn test_compute_cost_errors() {
        let mut m = model(0.1, 0);
        assert_eq!(
            m.compute_cost(&[1.0, 2.0], &[1.0]).unwrap_err(),
            RegressionError::DimensionMismatch { x_len: 2, y_len: 1 }
        );
        assert_eq!(m.compute_cost(&[], &[]).unwrap_err(), RegressionError::EmptyInput);
        // failed calls leave the stored cost untouched
        assert_eq!(m.cost(), f64::INFINITY);
    }

    // === Gradient ===

    #[test]
    fn test_compute_gradient_known_values() {
        let m = model(0.1, 0);
        let grads = m.compute_gradient(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 0.0, 0.0).unwrap();

        assert_abs_diff_eq!(grads.dw, -14.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grads.db, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compute_gradient_zero_on_perfect_fit() {
        let m = model(0.1, 0);
        let grads = m.compute_gradient(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], 2.0, 1.0).unwrap();

        assert_abs_diff_eq!(grads.dw, 0.0);
        assert_abs_diff_eq!(grads.db, 0.0);
    }

    #[test]
    fn test_compute_gradient_ignores_instance_params() {
        let mut m = model(0.1, 0);
        m.set_params(LinearParams::new(100.0, -100.0));
        let (dw, db) = m
            .compute_gradient(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 0.0, 0.0)
            .unwrap()
            .into();

        assert_abs_diff_eq!(dw, -14.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(db, -2.0, epsilon = 1e-12);
        assert_eq!(m.params(), LinearParams::new(100.0, -100.0));
    }

    #[test]
    fn test_compute_gradient_errors() {
        let m = model(0.1, 0);
        assert!(matches!(
            m.compute_gradient(&[1.0], &[1.0, 2.0], 0.0, 0.0),
            Err(RegressionError::DimensionMismatch { x_len: 1, y_len: 2 })
        ));
        assert!(matches!(
            m.compute_gradient(&[], &[], 0.0, 0.0),
            Err(RegressionError::EmptyInput)
        ));
    }

    // === Gradient descent ===

    #[test]
    fn test_gradient_descent_identity_line() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        let mut m = model(0.1, 1000);

        let params = m.gradient_descent(&x, &y).unwrap();

        assert_abs_diff_eq!(params.weight, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(params.bias, 0.0, epsilon = 1e-3);
        assert_eq!(m.params(), params);
        assert_eq!(m.cost_history().len(), 1000);
        assert!(*m.cost_history().last().unwrap() < 1e-3);
        assert_eq!(m.cost(), *m.cost_history().last().unwrap());
    }

    #[test]
    fn test_gradient_descent_with_bias() {
        // y = x + 1
        let mut m = model(0.1, 5000);
        let params = m.gradient_descent(&[1.0, 2.0], &[2.0, 3.0]).unwrap();

        assert_abs_diff_eq!(params.weight, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(params.bias, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_gradient_descent_cost_non_increasing() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 5.0, 7.0, 9.0];
        let mut m = model(0.01, 300);
        m.gradient_descent(&x, &y).unwrap();

        let trace = m.cost_history();
        assert_eq!(trace.len(), 300);
        for pair in trace.windows(2) {
            assert!(pair[0] >= pair[1] - 1e-12, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_gradient_descent_first_step_is_simultaneous() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        let mut m = model(0.1, 1);
        let params = m.gradient_descent(&x, &y).unwrap();

        // both updates use the (0, 0) gradients: dw = -14/3, db = -2
        assert_abs_diff_eq!(params.weight, 0.1 * 14.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(params.bias, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(m.cost_history()[0], cost_by_hand(params, &x, &y), epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_descent_zero_iterations() {
        let mut m = model(0.1, 0);
        m.set_params(LinearParams::new(0.5, -0.5));
        let params = m.gradient_descent(&[1.0, 2.0], &[1.0, 2.0]).unwrap();

        assert_eq!(params, LinearParams::new(0.5, -0.5));
        assert!(m.cost_history().is_empty());
    }

    #[test]
    fn test_gradient_descent_errors_before_mutation() {
        let mut m = model(0.1, 10);
        m.gradient_descent(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        let before = m.clone();

        assert!(matches!(
            m.gradient_descent(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(RegressionError::DimensionMismatch { x_len: 3, y_len: 2 })
        ));
        assert!(matches!(
            m.gradient_descent(&[], &[]),
            Err(RegressionError::EmptyInput)
        ));
        assert_eq!(m.params(), before.params());
        assert_eq!(m.cost_history(), before.cost_history());
    }

    #[test]
    fn test_retrain_resets_history_by_default() {
        let mut m = model(0.1, 20);
        m.gradient_descent(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        m.gradient_descent(&[1.0, 2.0], &[1.0, 2.0]).unwrap();

        assert_eq!(m.cost_history().len(), 20);
    }

    #[test]
    fn test_resume_appends_history_and_continues() {
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 4.0, 6.0];
        let config = GradientDescentConfig::builder()
            .learning_rate(0.05)
            .iterations(10)
            .trace_mode(TraceMode::Resume)
            .build()
            .unwrap();

        let mut resumed = LinearRegressor::new(config).unwrap();
        resumed.gradient_descent(&x, &y).unwrap();
        resumed.gradient_descent(&x, &y).unwrap();

        let mut straight = model(0.05, 20);
        straight.gradient_descent(&x, &y).unwrap();

        assert_eq!(resumed.cost_history().len(), 20);
        assert_abs_diff_eq!(resumed.weight(), straight.weight(), epsilon = 1e-12);
        assert_abs_diff_eq!(resumed.bias(), straight.bias(), epsilon = 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut m = model(0.1, 5);
        m.gradient_descent(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        m.reset();

        assert_eq!(m.params(), LinearParams::default());
        assert_eq!(m.cost(), f64::INFINITY);
        assert!(m.cost_history().is_empty());
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        let mut m = model(0.1, 25);
        let mut seen = Vec::new();
        let outcome = m
            .gradient_descent_with(&[1.0, 2.0], &[1.0, 2.0], &mut |r: &IterationReport| {
                seen.push((r.iteration, r.cost));
                ControlFlow::Continue(())
            })
            .unwrap();

        assert_eq!(outcome.iterations, 25);
        assert!(!outcome.stopped_early);
        let costs: Vec<f64> = seen.iter().map(|&(_, c)| c).collect();
        assert_eq!(costs, m.cost_history());
        assert_eq!(seen.last().unwrap().0, 24);
    }

    #[test]
    fn test_observer_stops_cooperatively() {
        let mut m = model(0.1, 100);
        let outcome = m
            .gradient_descent_with(&[1.0, 2.0], &[1.0, 2.0], &mut |r: &IterationReport| {
                if r.iteration == 9 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();

        assert!(outcome.stopped_early);
        assert_eq!(outcome.iterations, 10);
        assert_eq!(m.cost_history().len(), 10);
        assert_eq!(m.params(), outcome.params);
    }

    #[test]
    fn test_huge_iteration_count_stopped_by_observer() {
        let mut m = model(0.1, usize::MAX);
        let outcome = m
            .gradient_descent_with(&[1.0, 2.0], &[1.0, 2.0], &mut |r: &IterationReport| {
                if r.iteration == 9 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();

        assert!(outcome.stopped_early);
        assert_eq!(outcome.iterations, 10);
        assert_eq!(m.cost_history().len(), 10);
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_predict_array() {
        let mut m = model(0.1, 0);
        m.set_params(LinearParams::new(2.0, 1.0));
        let out = m.predict_array(ndarray::arr1(&[0.0, 1.0, 2.0]).view());
        assert_eq!(out, ndarray::arr1(&[1.0, 3.0, 5.0]));
    }
}
