//! Decision records: contexts, actions, and the append-only log a fit consumes.

use crate::error::{BanditError, BanditResult};
use serde::{Deserialize, Serialize};

/// Feature vector describing the subject of a decision.
pub type Context = Vec<f64>;

/// Index into the fixed action set `[0, num_actions)`.
pub type Action = usize;

/// One logged decision with its observed outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub context: Context,
    pub action: Action,
    pub reward: f64,
}

impl Sample {
    pub fn new(context: Context, action: Action, reward: f64) -> Self {
        Self {
            context,
            action,
            reward,
        }
    }
}

/// Samples accumulated over one fitting period. Only ever appended to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Log {
    samples: Vec<Sample>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn record(&mut self, context: Context, action: Action, reward: f64) {
        self.push(Sample::new(context, action, reward));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Check every sample against the configured shape. Fails on the first
    /// offending sample.
    pub fn validate(&self, num_features: usize, num_actions: usize) -> BanditResult<()> {
        for (index, sample) in self.samples.iter().enumerate() {
            check_sample(sample, index, num_features, num_actions)?;
        }
        Ok(())
    }
}

impl Extend<Sample> for Log {
    fn extend<T: IntoIterator<Item = Sample>>(&mut self, iter: T) {
        self.samples.extend(iter);
    }
}

impl FromIterator<Sample> for Log {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Sample>> for Log {
    fn from(samples: Vec<Sample>) -> Self {
        Self { samples }
    }
}

impl<'a> IntoIterator for &'a Log {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Both dimensions of a policy must be non-empty.
pub fn check_shape(num_features: usize, num_actions: usize) -> BanditResult<()> {
    if num_features == 0 {
        return Err(BanditError::Config("num_features must be at least 1".into()));
    }
    if num_actions == 0 {
        return Err(BanditError::Config("num_actions must be at least 1".into()));
    }
    Ok(())
}

/// Length must equal `num_features` and every value must be finite.
pub fn check_context(context: &[f64], num_features: usize) -> BanditResult<()> {
    if context.len() != num_features {
        return Err(BanditError::DimensionMismatch {
            expected: num_features,
            got: context.len(),
        });
    }
    if let Some(index) = context.iter().position(|x| !x.is_finite()) {
        return Err(BanditError::NonFinite {
            field: "context",
            index,
        });
    }
    Ok(())
}

/// Full boundary check for a logged sample at position `index` of its log.
pub fn check_sample(
    sample: &Sample,
    index: usize,
    num_features: usize,
    num_actions: usize,
) -> BanditResult<()> {
    check_context(&sample.context, num_features)?;
    check_action(sample.action, num_actions)?;
    if !sample.reward.is_finite() {
        return Err(BanditError::NonFinite {
            field: "reward",
            index,
        });
    }
    Ok(())
}

pub fn check_action(action: Action, num_actions: usize) -> BanditResult<()> {
    if action >= num_actions {
        return Err(BanditError::ActionOutOfRange {
            action,
            num_actions,
        });
    }
    Ok(())
}
