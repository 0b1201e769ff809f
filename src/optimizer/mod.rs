use crate::model::{Gradients, LinearParams};

/// Trait for gradient-based optimizers.
///
/// `step` is pure: it reads the parameter snapshot and the gradients computed from
/// that same snapshot, and returns a new value. Every parameter is therefore updated
/// from the start-of-iteration state, never from a half-updated one.
pub trait Optimizer<P, G = P> {
    /// Returns `params - learning_rate * gradients`.
    fn step(&self, params: &P, gradients: &G) -> P;
}

/// Plain gradient descent:
/// ```text
/// θ ← θ - α · ∇J(θ)
/// ```
///
/// Stateless; no momentum and no adaptive step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SGD {
    lr: f64,
}

impl SGD {
    /// Creates an optimizer with step size `lr`.
    ///
    /// The value is not checked here;
    /// [`GradientDescentConfig::validate`](crate::config::GradientDescentConfig::validate)
    /// is where α is rejected.
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl Optimizer<LinearParams, Gradients> for SGD {
    fn step(&self, params: &LinearParams, grads: &Gradients) -> LinearParams {
        LinearParams {
            weight: params.weight - self.lr * grads.dw,
            bias: params.bias - self.lr * grads.db,
        }
    }
}
