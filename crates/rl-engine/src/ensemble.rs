//! Offline fitting: one model per action, optionally bootstrapped into an
//! ensemble of complete model sets.

use crate::model::LinearRewardModel;
use crate::partition::{partition_by_action, ActionGroup};
use rand::Rng;
use recloop_core::types::check_shape;
use recloop_core::{Action, BanditResult, Log};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A complete set of reward models, one per action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSet {
    models: Vec<LinearRewardModel>,
}

impl ModelSet {
    pub fn new(models: Vec<LinearRewardModel>) -> Self {
        Self { models }
    }

    pub fn zeros(num_features: usize, num_actions: usize) -> Self {
        Self {
            models: (0..num_actions)
                .map(|_| LinearRewardModel::zeros(num_features))
                .collect(),
        }
    }

    pub fn random<R: Rng + ?Sized>(num_features: usize, num_actions: usize, rng: &mut R) -> Self {
        Self {
            models: (0..num_actions)
                .map(|_| LinearRewardModel::random(num_features, rng))
                .collect(),
        }
    }

    pub fn num_actions(&self) -> usize {
        self.models.len()
    }

    pub fn model(&self, action: Action) -> Option<&LinearRewardModel> {
        self.models.get(action)
    }

    pub fn models(&self) -> &[LinearRewardModel] {
        &self.models
    }

    /// Predicted reward for every action, indexed by action.
    pub fn predict_all(&self, context: &[f64]) -> Vec<f64> {
        self.models.iter().map(|m| m.predict(context)).collect()
    }

    /// Action with the highest predicted reward. Ties go to the lowest index.
    pub fn greedy_action(&self, context: &[f64]) -> Action {
        let mut best_score = f64::NEG_INFINITY;
        let mut best_action = 0;

        for (action, model) in self.models.iter().enumerate() {
            let score = model.predict(context);
            if score > best_score {
                best_score = score;
                best_action = action;
            }
        }

        best_action
    }
}

/// Independently bootstrapped model sets, used by Thompson sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ensemble {
    members: Vec<ModelSet>,
}

impl Ensemble {
    pub fn new(members: Vec<ModelSet>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, index: usize) -> Option<&ModelSet> {
        self.members.get(index)
    }

    pub fn members(&self) -> &[ModelSet] {
        &self.members
    }

    /// Fraction of members whose greedy choice is each action. Under uniform
    /// member selection this is exactly the per-action selection probability.
    pub fn win_fractions(&self, context: &[f64], num_actions: usize) -> Vec<f64> {
        let mut wins = vec![0usize; num_actions];
        for member in &self.members {
            let action = member.greedy_action(context);
            if let Some(count) = wins.get_mut(action) {
                *count += 1;
            }
        }
        let total = self.members.len().max(1) as f64;
        wins.into_iter().map(|w| w as f64 / total).collect()
    }
}

/// Fits model sets from a log for a fixed feature/action shape.
#[derive(Debug, Clone, Copy)]
pub struct ModelEnsembleBuilder {
    num_features: usize,
    num_actions: usize,
}

impl ModelEnsembleBuilder {
    /// Fails with `Config` if either dimension is zero.
    pub fn new(num_features: usize, num_actions: usize) -> BanditResult<Self> {
        check_shape(num_features, num_actions)?;
        Ok(Self {
            num_features,
            num_actions,
        })
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// One model per action on that action's full sample set.
    pub fn fit_single(&self, log: &Log) -> BanditResult<ModelSet> {
        let groups = partition_by_action(log, self.num_features, self.num_actions)?;
        self.report_empty(&groups);

        let models = groups
            .iter()
            .enumerate()
            .map(|(action, group)| {
                debug!(action, samples = group.len(), "fitting reward model");
                LinearRewardModel::fit(
                    group.design_matrix(self.num_features).view(),
                    group.reward_vector().view(),
                )
            })
            .collect();

        Ok(ModelSet::new(models))
    }

    /// `ensemble_size` complete model sets, each action resampled on its own.
    ///
    /// An action with `M` samples is refit on `M` indices drawn with
    /// replacement from `[0, M)`. An action with none gets the zero model.
    pub fn fit_bootstrap<R: Rng + ?Sized>(
        &self,
        log: &Log,
        ensemble_size: usize,
        rng: &mut R,
    ) -> BanditResult<Ensemble> {
        let groups = partition_by_action(log, self.num_features, self.num_actions)?;
        self.report_empty(&groups);

        let mut members = Vec::with_capacity(ensemble_size);
        for _ in 0..ensemble_size {
            let mut models = Vec::with_capacity(self.num_actions);
            for group in &groups {
                models.push(self.fit_resampled(group, rng));
            }
            members.push(ModelSet::new(models));
        }

        debug!(ensemble_size, samples = log.len(), "bootstrap ensemble fitted");
        Ok(Ensemble::new(members))
    }

    fn fit_resampled<R: Rng + ?Sized>(
        &self,
        group: &ActionGroup<'_>,
        rng: &mut R,
    ) -> LinearRewardModel {
        let m = group.len();
        if m == 0 {
            return LinearRewardModel::zeros(self.num_features);
        }
        let indices: Vec<usize> = (0..m).map(|_| rng.gen_range(0..m)).collect();
        let (x, y) = group.resample(self.num_features, indices);
        LinearRewardModel::fit(x.view(), y.view())
    }

    fn report_empty(&self, groups: &[ActionGroup<'_>]) {
        let empty: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_empty())
            .map(|(action, _)| action)
            .collect();
        if !empty.is_empty() {
            warn!(
                actions = ?empty,
                num_actions = self.num_actions,
                "actions without samples fall back to the zero model"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use recloop_core::{BanditError, Sample};

    fn one_hot_log() -> Log {
        vec![
            Sample::new(vec![1.0, 0.0, 0.0], 0, 0.6),
            Sample::new(vec![0.0, 1.0, 0.0], 0, 0.9),
            Sample::new(vec![0.0, 0.0, 1.0], 0, 1.3),
            Sample::new(vec![1.0, 0.0, 0.0], 1, 2.0),
        ]
        .into()
    }

    #[test]
    fn test_fit_single_covers_every_action() {
        let builder = ModelEnsembleBuilder::new(3, 3).unwrap();
        let set = builder.fit_single(&one_hot_log()).unwrap();

        assert_eq!(set.num_actions(), 3);
        let beta0 = set.model(0).unwrap().coefficients().to_vec();
        for (b, expected) in beta0.iter().zip([0.6, 0.9, 1.3]) {
            assert!((b - expected).abs() < 1e-12);
        }
        assert!(set.model(2).unwrap().is_zero());
    }

    #[test]
    fn test_empty_log_yields_zero_models() {
        let builder = ModelEnsembleBuilder::new(4, 2).unwrap();
        let set = builder.fit_single(&Log::new()).unwrap();
        assert_eq!(set, ModelSet::zeros(4, 2));

        let ensemble = builder
            .fit_bootstrap(&Log::new(), 3, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(ensemble.len(), 3);
        assert!(ensemble
            .members()
            .iter()
            .all(|m| m.models().iter().all(|b| b.is_zero())));
    }

    #[test]
    fn test_builder_rejects_empty_shapes() {
        assert!(matches!(
            ModelEnsembleBuilder::new(3, 0),
            Err(BanditError::Config(_))
        ));
        assert!(matches!(
            ModelEnsembleBuilder::new(0, 3),
            Err(BanditError::Config(_))
        ));
    }

    #[test]
    fn test_greedy_tie_break_prefers_lowest_index() {
        let set = ModelSet::new(vec![
            LinearRewardModel::from_coefficients(vec![1.0]),
            LinearRewardModel::from_coefficients(vec![2.0]),
            LinearRewardModel::from_coefficients(vec![2.0]),
        ]);
        assert_eq!(set.greedy_action(&[1.0]), 1);
        assert_eq!(ModelSet::zeros(1, 4).greedy_action(&[5.0]), 0);
    }

    #[test]
    fn test_predict_all_indexed_by_action() {
        let set = ModelSet::new(vec![
            LinearRewardModel::from_coefficients(vec![1.0, 0.0]),
            LinearRewardModel::from_coefficients(vec![0.0, 3.0]),
        ]);
        assert_eq!(set.predict_all(&[2.0, 1.0]), vec![2.0, 3.0]);
    }

    #[test]
    fn test_bootstrap_is_reproducible_for_a_seed() {
        let builder = ModelEnsembleBuilder::new(3, 2).unwrap();
        let log = one_hot_log();
        let a = builder
            .fit_bootstrap(&log, 5, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = builder
            .fit_bootstrap(&log, 5, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bootstrap_single_sample_action_is_stable() {
        // Every resample of one sample is that sample, so every member agrees.
        let builder = ModelEnsembleBuilder::new(3, 2).unwrap();
        let ensemble = builder
            .fit_bootstrap(&one_hot_log(), 8, &mut StdRng::seed_from_u64(9))
            .unwrap();
        let first = ensemble.member(0).unwrap().model(1).unwrap().clone();
        assert!(ensemble
            .members()
            .iter()
            .all(|m| m.model(1).unwrap() == &first));
        assert!((first.predict(&[1.0, 0.0, 0.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_bootstrap_members_differ_on_sparse_action() {
        let builder = ModelEnsembleBuilder::new(3, 1).unwrap();
        let log: Log = one_hot_log()
            .iter()
            .filter(|s| s.action == 0)
            .cloned()
            .collect();
        let ensemble = builder
            .fit_bootstrap(&log, 30, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let distinct = ensemble
            .members()
            .iter()
            .filter(|m| m != &ensemble.member(0).unwrap())
            .count();
        assert!(distinct > 0);
    }

    #[test]
    fn test_win_fractions_sum_to_one() {
        let ensemble = Ensemble::new(vec![
            ModelSet::new(vec![
                LinearRewardModel::from_coefficients(vec![1.0]),
                LinearRewardModel::from_coefficients(vec![0.0]),
            ]),
            ModelSet::new(vec![
                LinearRewardModel::from_coefficients(vec![0.0]),
                LinearRewardModel::from_coefficients(vec![1.0]),
            ]),
            ModelSet::new(vec![
                LinearRewardModel::from_coefficients(vec![0.0]),
                LinearRewardModel::from_coefficients(vec![2.0]),
            ]),
        ]);
        let fractions = ensemble.win_fractions(&[1.0], 2);
        assert!((fractions[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((fractions[1] - 2.0 / 3.0).abs() < 1e-12);
    }
}
