//! Thompson sampling over a bootstrap ensemble.
//!
//! Each decision picks one ensemble member uniformly and acts greedily on
//! it, so an action is chosen with probability equal to the share of
//! members that rank it best. When the members agree this reduces to
//! greedy; disagreement, which is largest for sparsely observed actions,
//! turns into exploration.

use crate::ensemble::{Ensemble, ModelEnsembleBuilder, ModelSet};
use crate::policy::{LiveModel, Policy};
use rand::Rng;
use recloop_core::types::check_context;
use recloop_core::{Action, BanditError, BanditResult, Log};
use std::sync::Arc;
use tracing::info;

pub struct ThompsonSamplingPolicy {
    builder: ModelEnsembleBuilder,
    ensemble_size: usize,
    ensemble: LiveModel<Ensemble>,
}

impl ThompsonSamplingPolicy {
    pub fn new(
        num_features: usize,
        num_actions: usize,
        ensemble_size: usize,
    ) -> BanditResult<Self> {
        if ensemble_size == 0 {
            return Err(BanditError::Config(
                "ensemble_size must be at least 1".into(),
            ));
        }
        Ok(Self {
            builder: ModelEnsembleBuilder::new(num_features, num_actions)?,
            ensemble_size,
            ensemble: LiveModel::empty(),
        })
    }

    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    pub fn ensemble(&self) -> Option<Arc<Ensemble>> {
        self.ensemble.snapshot()
    }

    /// Probability of choosing each action for `context` under the live
    /// ensemble.
    pub fn action_probabilities(&self, context: &[f64]) -> BanditResult<Vec<f64>> {
        check_context(context, self.num_features())?;
        let ensemble = self
            .ensemble
            .snapshot()
            .ok_or(BanditError::UninitializedState)?;
        Ok(ensemble.win_fractions(context, self.num_actions()))
    }
}

impl Policy for ThompsonSamplingPolicy {
    fn name(&self) -> &'static str {
        "thompson_sampling"
    }

    fn num_features(&self) -> usize {
        self.builder.num_features()
    }

    fn num_actions(&self) -> usize {
        self.builder.num_actions()
    }

    fn fit_offline<R: Rng + ?Sized>(&self, log: &Log, rng: &mut R) -> BanditResult<()> {
        let ensemble = self.builder.fit_bootstrap(log, self.ensemble_size, rng)?;
        self.ensemble.publish(ensemble);
        info!(
            policy = self.name(),
            samples = log.len(),
            ensemble_size = self.ensemble_size,
            num_actions = self.num_actions(),
            "ensemble published"
        );
        Ok(())
    }

    fn decide<R: Rng + ?Sized>(&self, context: &[f64], rng: &mut R) -> BanditResult<Action> {
        check_context(context, self.num_features())?;
        let ensemble = self
            .ensemble
            .snapshot()
            .ok_or(BanditError::UninitializedState)?;

        let j = rng.gen_range(0..ensemble.len());
        let member = ensemble
            .member(j)
            .ok_or(BanditError::UninitializedState)?;
        Ok(member.greedy_action(context))
    }

    fn reset<R: Rng + ?Sized>(&self, rng: &mut R) {
        let members = (0..self.ensemble_size)
            .map(|_| ModelSet::random(self.num_features(), self.num_actions(), rng))
            .collect();
        self.ensemble.publish(Ensemble::new(members));
    }
}
