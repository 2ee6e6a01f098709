//! Config-driven choice of exploration strategy, dispatched statically.

use crate::epsilon_greedy::EpsilonGreedyPolicy;
use crate::greedy::GreedyPolicy;
use crate::policy::Policy;
use crate::thompson::ThompsonSamplingPolicy;
use rand::Rng;
use recloop_core::{Action, BanditConfig, BanditResult, Log, PolicyKind};

pub enum BanditPolicy {
    Greedy(GreedyPolicy),
    EpsilonGreedy(EpsilonGreedyPolicy),
    ThompsonSampling(ThompsonSamplingPolicy),
}

impl BanditPolicy {
    pub fn from_config(config: &BanditConfig) -> BanditResult<Self> {
        config.validate()?;
        let (f, a) = (config.num_features, config.num_actions);
        let policy = match config.policy {
            PolicyKind::Greedy => BanditPolicy::Greedy(GreedyPolicy::new(f, a)?),
            PolicyKind::EpsilonGreedy { epsilon } => {
                BanditPolicy::EpsilonGreedy(EpsilonGreedyPolicy::new(f, a, epsilon)?)
            }
            PolicyKind::ThompsonSampling { ensemble_size } => BanditPolicy::ThompsonSampling(
                ThompsonSamplingPolicy::new(f, a, ensemble_size)?,
            ),
        };
        tracing::debug!(
            policy = policy.name(),
            num_features = f,
            num_actions = a,
            "policy constructed"
        );
        Ok(policy)
    }
}

impl Policy for BanditPolicy {
    fn name(&self) -> &'static str {
        match self {
            BanditPolicy::Greedy(p) => p.name(),
            BanditPolicy::EpsilonGreedy(p) => p.name(),
            BanditPolicy::ThompsonSampling(p) => p.name(),
        }
    }

    fn num_features(&self) -> usize {
        match self {
            BanditPolicy::Greedy(p) => p.num_features(),
            BanditPolicy::EpsilonGreedy(p) => p.num_features(),
            BanditPolicy::ThompsonSampling(p) => p.num_features(),
        }
    }

    fn num_actions(&self) -> usize {
        match self {
            BanditPolicy::Greedy(p) => p.num_actions(),
            BanditPolicy::EpsilonGreedy(p) => p.num_actions(),
            BanditPolicy::ThompsonSampling(p) => p.num_actions(),
        }
    }

    fn fit_offline<R: Rng + ?Sized>(&self, log: &Log, rng: &mut R) -> BanditResult<()> {
        match self {
            BanditPolicy::Greedy(p) => p.fit_offline(log, rng),
            BanditPolicy::EpsilonGreedy(p) => p.fit_offline(log, rng),
            BanditPolicy::ThompsonSampling(p) => p.fit_offline(log, rng),
        }
    }

    fn decide<R: Rng + ?Sized>(&self, context: &[f64], rng: &mut R) -> BanditResult<Action> {
        match self {
            BanditPolicy::Greedy(p) => p.decide(context, rng),
            BanditPolicy::EpsilonGreedy(p) => p.decide(context, rng),
            BanditPolicy::ThompsonSampling(p) => p.decide(context, rng),
        }
    }

    fn reset<R: Rng + ?Sized>(&self, rng: &mut R) {
        match self {
            BanditPolicy::Greedy(p) => p.reset(rng),
            BanditPolicy::EpsilonGreedy(p) => p.reset(rng),
            BanditPolicy::ThompsonSampling(p) => p.reset(rng),
        }
    }
}
