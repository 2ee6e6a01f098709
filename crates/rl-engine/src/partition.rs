//! Splits a log into per-action training sets.

use ndarray::{Array1, Array2};
use recloop_core::types::check_sample;
use recloop_core::{BanditResult, Log};

/// Contexts and rewards observed for one action, in log order.
#[derive(Debug, Clone, Default)]
pub struct ActionGroup<'a> {
    pub contexts: Vec<&'a [f64]>,
    pub rewards: Vec<f64>,
}

impl<'a> ActionGroup<'a> {
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Stack the contexts into an `N x num_features` design matrix.
    pub fn design_matrix(&self, num_features: usize) -> Array2<f64> {
        self.design_matrix_for(num_features, 0..self.len())
    }

    pub fn reward_vector(&self) -> Array1<f64> {
        Array1::from(self.rewards.clone())
    }

    /// Design matrix and reward vector for the rows named by `indices`,
    /// repeats allowed.
    pub fn resample<I>(&self, num_features: usize, indices: I) -> (Array2<f64>, Array1<f64>)
    where
        I: IntoIterator<Item = usize> + Clone,
    {
        let x = self.design_matrix_for(num_features, indices.clone());
        let y = indices.into_iter().map(|i| self.rewards[i]).collect();
        (x, y)
    }

    fn design_matrix_for<I>(&self, num_features: usize, indices: I) -> Array2<f64>
    where
        I: IntoIterator<Item = usize>,
    {
        let flat: Vec<f64> = indices
            .into_iter()
            .flat_map(|i| self.contexts[i].iter().copied())
            .collect();
        let rows = flat.len() / num_features.max(1);
        Array2::from_shape_vec((rows, num_features), flat)
            .unwrap_or_else(|_| Array2::zeros((0, num_features)))
    }
}

/// Group every sample by its action. Actions never observed get an empty
/// group. Fails on the first sample with the wrong shape or a non-finite
/// value.
pub fn partition_by_action(
    log: &Log,
    num_features: usize,
    num_actions: usize,
) -> BanditResult<Vec<ActionGroup<'_>>> {
    let mut groups: Vec<ActionGroup<'_>> =
        (0..num_actions).map(|_| ActionGroup::default()).collect();

    for (index, sample) in log.iter().enumerate() {
        check_sample(sample, index, num_features, num_actions)?;
        let group = &mut groups[sample.action];
        group.contexts.push(&sample.context);
        group.rewards.push(sample.reward);
    }

    Ok(groups)
}
