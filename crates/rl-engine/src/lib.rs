//! Contextual-bandit decision engine: per-action linear reward models fit
//! offline from logged outcomes, and greedy, epsilon-greedy, and Thompson
//! sampling policies that act on them.

pub mod engine;
pub mod ensemble;
pub mod epsilon_greedy;
pub mod greedy;
pub mod linalg;
pub mod model;
pub mod partition;
pub mod policy;
pub mod thompson;

pub use engine::BanditPolicy;
pub use ensemble::{Ensemble, ModelEnsembleBuilder, ModelSet};
pub use epsilon_greedy::EpsilonGreedyPolicy;
pub use greedy::GreedyPolicy;
pub use model::LinearRewardModel;
pub use partition::{partition_by_action, ActionGroup};
pub use policy::{LiveModel, Policy};
pub use thompson::ThompsonSamplingPolicy;
