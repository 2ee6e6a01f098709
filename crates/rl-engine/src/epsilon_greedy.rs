//! Greedy exploitation with a fixed rate of uniform exploration.

use crate::ensemble::ModelSet;
use crate::greedy::GreedyPolicy;
use crate::policy::Policy;
use rand::Rng;
use recloop_core::types::check_context;
use recloop_core::{Action, BanditError, BanditResult, Log};
use std::sync::Arc;

pub struct EpsilonGreedyPolicy {
    inner: GreedyPolicy,
    epsilon: f64,
}

impl EpsilonGreedyPolicy {
    pub fn new(num_features: usize, num_actions: usize, epsilon: f64) -> BanditResult<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BanditError::Config(format!(
                "epsilon must lie in [0, 1], got {epsilon}"
            )));
        }
        Ok(Self {
            inner: GreedyPolicy::new(num_features, num_actions)?,
            epsilon,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn model_set(&self) -> Option<Arc<ModelSet>> {
        self.inner.model_set()
    }
}

impl Policy for EpsilonGreedyPolicy {
    fn name(&self) -> &'static str {
        "epsilon_greedy"
    }

    fn num_features(&self) -> usize {
        self.inner.num_features()
    }

    fn num_actions(&self) -> usize {
        self.inner.num_actions()
    }

    fn fit_offline<R: Rng + ?Sized>(&self, log: &Log, _rng: &mut R) -> BanditResult<()> {
        self.inner.fit(log, self.name())
    }

    /// One uniform draw decides the branch: below epsilon the action is
    /// uniform over all actions and predictions are ignored; otherwise greedy.
    fn decide<R: Rng + ?Sized>(&self, context: &[f64], rng: &mut R) -> BanditResult<Action> {
        check_context(context, self.num_features())?;
        let models = self
            .inner
            .model_set()
            .ok_or(BanditError::UninitializedState)?;

        let u: f64 = rng.gen();
        if u < self.epsilon {
            return Ok(rng.gen_range(0..self.num_actions()));
        }
        Ok(models.greedy_action(context))
    }

    fn reset<R: Rng + ?Sized>(&self, rng: &mut R) {
        self.inner.randomize(rng);
    }
}
