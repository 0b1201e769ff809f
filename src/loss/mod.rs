/// A differentiable loss over single-feature predictions.
///
/// Implementors define:
/// - the scalar cost, recorded in the cost history;
/// - the gradient of that cost w.r.t. each prediction, which
///   [`LinearParams::backward`](crate::model::LinearParams::backward) turns into parameter gradients.
///
/// Both methods assume `predictions.len() == targets.len() >= 1`; callers go through
/// [`TrainingSet`](crate::dataset::TrainingSet) to guarantee it.
pub trait Loss {
    fn cost(&self, predictions: &[f64], targets: &[f64]) -> f64;

    /// ∂cost/∂pred_i for every sample.
    fn grad_wrt_prediction(&self, predictions: &[f64], targets: &[f64]) -> Vec<f64>;
}

/// Halved mean squared error: `J = (1 / 2m) * Σ(pred_i - target_i)^2`
///
/// Gradient w.r.t. prediction: `∂J/∂pred_i = (pred_i - target_i) / m`
///
/// The `1/2` cancels the exponent when differentiating, so the residual appears
/// unscaled in the gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfMSELoss;

impl Loss for HalfMSELoss {
    fn cost(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        let m = predictions.len() as f64;
        let sum_sq: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| (p - t) * (p - t))
            .sum();
        sum_sq / (2.0 * m)
    }

    fn grad_wrt_prediction(&self, predictions: &[f64], targets: &[f64]) -> Vec<f64> {
        let m = predictions.len() as f64;
        predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| (p - t) / m)
            .collect()
    }
}
