use crate::dataset::TrainingSet;

pub mod linear;
pub use linear::LinearRegressor;

/// Parameters of the line `f(x) = weight * x + bias`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearParams {
    pub weight: f64,
    pub bias: f64,
}

/// Partial derivatives of the cost w.r.t. weight and bias.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gradients {
    pub dw: f64,
    pub db: f64,
}

impl LinearParams {
    pub fn new(weight: f64, bias: f64) -> Self {
        Self { weight, bias }
    }

    #[inline]
    pub fn predict_one(&self, x: f64) -> f64 {
        self.weight * x + self.bias
    }

    /// Predictions for every `x_i` of the training set.
    pub fn forward(&self, data: &TrainingSet<'_>) -> Vec<f64> {
        data.x().iter().map(|&x| self.predict_one(x)).collect()
    }

    /// Chains `∂J/∂pred` through the line: `dw = Σ g_i·x_i`, `db = Σ g_i`.
    ///
    /// The line is linear in its parameters, so the result does not depend on `self`;
    /// the receiver only ties the gradient to the parameters it was computed for.
    pub fn backward(&self, data: &TrainingSet<'_>, grad_output: &[f64]) -> Gradients {
        let (dw, db) = data
            .x()
            .iter()
            .zip(grad_output)
            .fold((0.0, 0.0), |(dw, db), (&x, &g)| (dw + g * x, db + g));
        Gradients { dw, db }
    }
}

impl From<LinearParams> for (f64, f64) {
    fn from(p: LinearParams) -> Self {
        (p.weight, p.bias)
    }
}

impl From<Gradients> for (f64, f64) {
    fn from(g: Gradients) -> Self {
        (g.dw, g.db)
    }
}

/// Prediction at two arities, resolved at compile time.
pub trait InferenceModel {
    type InputSingle;
    type OutputSingle;
    type InputBatch: ?Sized;
    type OutputBatch;

    fn predict(&self, input: Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;
}

impl InferenceModel for LinearParams {
    type InputSingle = f64;
    type OutputSingle = f64;
    type InputBatch = [f64];
    type OutputBatch = Vec<f64>;

    fn predict(&self, x: f64) -> f64 {
        self.predict_one(x)
    }

    fn predict_batch(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict_one(x)).collect()
    }
}
