//! The decision interface shared by every exploration strategy, and the
//! swap-on-publish cell that holds a policy's live model state.

use parking_lot::RwLock;
use rand::Rng;
use recloop_core::{Action, BanditResult, Log};
use std::sync::Arc;

/// Online decision rule fit offline from logged outcomes.
///
/// All randomness comes from the caller's generator, so a seeded generator
/// makes both fits and decisions reproducible.
pub trait Policy: Send + Sync {
    fn name(&self) -> &'static str;

    fn num_features(&self) -> usize;

    fn num_actions(&self) -> usize;

    /// Replace the live model state with one fit on `log`. On error the
    /// previous state stays live.
    fn fit_offline<R: Rng + ?Sized>(&self, log: &Log, rng: &mut R) -> BanditResult<()>;

    /// Choose an action for `context`. Fails with `UninitializedState` if
    /// neither `reset` nor `fit_offline` has run.
    fn decide<R: Rng + ?Sized>(&self, context: &[f64], rng: &mut R) -> BanditResult<Action>;

    /// Replace the live model state with random coefficients.
    fn reset<R: Rng + ?Sized>(&self, rng: &mut R);
}

/// Holds the current model state behind a single pointer. Readers take a
/// snapshot `Arc` and score without holding the lock; writers publish a
/// fully built replacement in one swap.
pub struct LiveModel<T> {
    current: RwLock<Option<Arc<T>>>,
}

impl<T> LiveModel<T> {
    pub fn empty() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.current.read().clone()
    }

    pub fn publish(&self, value: T) {
        let next = Arc::new(value);
        *self.current.write() = Some(next);
    }

    pub fn is_initialized(&self) -> bool {
        self.current.read().is_some()
    }
}

impl<T> Default for LiveModel<T> {
    fn default() -> Self {
        Self::empty()
    }
}
