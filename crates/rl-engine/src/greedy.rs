//! Pure exploitation: always the action with the highest predicted reward.

use crate::ensemble::{ModelEnsembleBuilder, ModelSet};
use crate::policy::{LiveModel, Policy};
use rand::Rng;
use recloop_core::types::check_context;
use recloop_core::{Action, BanditError, BanditResult, Log};
use std::sync::Arc;
use tracing::info;

pub struct GreedyPolicy {
    builder: ModelEnsembleBuilder,
    models: LiveModel<ModelSet>,
}

impl GreedyPolicy {
    pub fn new(num_features: usize, num_actions: usize) -> BanditResult<Self> {
        Ok(Self {
            builder: ModelEnsembleBuilder::new(num_features, num_actions)?,
            models: LiveModel::empty(),
        })
    }

    /// The currently published model set, if any.
    pub fn model_set(&self) -> Option<Arc<ModelSet>> {
        self.models.snapshot()
    }

    /// Greedy choice with no randomness; shared with epsilon-greedy's
    /// exploitation branch.
    pub(crate) fn exploit(&self, context: &[f64]) -> BanditResult<Action> {
        check_context(context, self.builder.num_features())?;
        let models = self
            .models
            .snapshot()
            .ok_or(BanditError::UninitializedState)?;
        Ok(models.greedy_action(context))
    }

    pub(crate) fn fit(&self, log: &Log, policy: &'static str) -> BanditResult<()> {
        let set = self.builder.fit_single(log)?;
        self.models.publish(set);
        info!(
            policy,
            samples = log.len(),
            num_actions = self.builder.num_actions(),
            "model set published"
        );
        Ok(())
    }

    pub(crate) fn randomize<R: Rng + ?Sized>(&self, rng: &mut R) {
        self.models.publish(ModelSet::random(
            self.builder.num_features(),
            self.builder.num_actions(),
            rng,
        ));
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn num_features(&self) -> usize {
        self.builder.num_features()
    }

    fn num_actions(&self) -> usize {
        self.builder.num_actions()
    }

    fn fit_offline<R: Rng + ?Sized>(&self, log: &Log, _rng: &mut R) -> BanditResult<()> {
        self.fit(log, self.name())
    }

    fn decide<R: Rng + ?Sized>(&self, context: &[f64], _rng: &mut R) -> BanditResult<Action> {
        self.exploit(context)
    }

    fn reset<R: Rng + ?Sized>(&self, rng: &mut R) {
        self.randomize(rng);
    }
}
