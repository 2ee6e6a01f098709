//! Per-action linear reward predictor.

use crate::linalg;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Coefficients `beta` such that predicted reward = `dot(context, beta)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRewardModel {
    beta: Array1<f64>,
}

impl LinearRewardModel {
    /// The model for an action with no observations: predicts 0 everywhere.
    pub fn zeros(num_features: usize) -> Self {
        Self {
            beta: Array1::zeros(num_features),
        }
    }

    /// Coefficients drawn from a standard normal, used before any fit.
    pub fn random<R: Rng + ?Sized>(num_features: usize, rng: &mut R) -> Self {
        let beta = (0..num_features)
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        Self { beta }
    }

    pub fn from_coefficients(beta: Vec<f64>) -> Self {
        Self {
            beta: Array1::from(beta),
        }
    }

    /// Least-squares fit of `rewards` on the rows of `contexts`.
    ///
    /// With zero rows the solver is skipped and the zero model returned.
    /// Rank-deficient designs resolve to the minimum-norm solution.
    pub fn fit(contexts: ArrayView2<'_, f64>, rewards: ArrayView1<'_, f64>) -> Self {
        debug_assert_eq!(contexts.nrows(), rewards.len());
        if contexts.nrows() == 0 {
            return Self::zeros(contexts.ncols());
        }
        Self {
            beta: linalg::least_squares(contexts, rewards),
        }
    }

    pub fn predict(&self, context: &[f64]) -> f64 {
        debug_assert_eq!(context.len(), self.beta.len(), "context length mismatch");
        self.beta
            .iter()
            .zip(context.iter())
            .map(|(b, x)| b * x)
            .sum()
    }

    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.beta.view()
    }

    pub fn num_features(&self) -> usize {
        self.beta.len()
    }

    pub fn is_zero(&self) -> bool {
        self.beta.iter().all(|b| *b == 0.0)
    }
}
