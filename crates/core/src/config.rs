use crate::error::{BanditError, BanditResult};
use crate::types::check_shape;
use serde::{Deserialize, Serialize};

/// Root application configuration. Loaded from environment variables
/// with the prefix `RECLOOP__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub bandit: BanditConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Exploration strategy and its parameters. Fixed for the lifetime of the
/// policy built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyKind {
    Greedy,
    EpsilonGreedy {
        epsilon: f64,
    },
    ThompsonSampling {
        ensemble_size: usize,
    },
}

impl Default for PolicyKind {
    fn default() -> Self {
        default_policy()
    }
}

impl PolicyKind {
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Greedy => "greedy",
            PolicyKind::EpsilonGreedy { .. } => "epsilon_greedy",
            PolicyKind::ThompsonSampling { .. } => "thompson_sampling",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanditConfig {
    #[serde(default = "default_num_features")]
    pub num_features: usize,
    #[serde(default = "default_num_actions")]
    pub num_actions: usize,
    #[serde(default = "default_policy")]
    pub policy: PolicyKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_periods")]
    pub periods: usize,
    #[serde(default = "default_decisions_per_period")]
    pub decisions_per_period: usize,
    #[serde(default = "default_reward_noise")]
    pub reward_noise: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_num_features() -> usize {
    5
}
fn default_num_actions() -> usize {
    10
}
fn default_policy() -> PolicyKind {
    PolicyKind::ThompsonSampling {
        ensemble_size: default_ensemble_size(),
    }
}
fn default_ensemble_size() -> usize {
    20
}
fn default_periods() -> usize {
    10
}
fn default_decisions_per_period() -> usize {
    1000
}
fn default_reward_noise() -> f64 {
    0.1
}
fn default_seed() -> u64 {
    17
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            num_features: default_num_features(),
            num_actions: default_num_actions(),
            policy: default_policy(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            decisions_per_period: default_decisions_per_period(),
            reward_noise: default_reward_noise(),
            seed: default_seed(),
        }
    }
}

impl BanditConfig {
    pub fn new(num_features: usize, num_actions: usize, policy: PolicyKind) -> Self {
        Self {
            num_features,
            num_actions,
            policy,
        }
    }

    /// Reject shapes and parameters no policy can run with.
    pub fn validate(&self) -> BanditResult<()> {
        check_shape(self.num_features, self.num_actions)?;
        match self.policy {
            PolicyKind::Greedy => {}
            PolicyKind::EpsilonGreedy { epsilon } => {
                if !(0.0..=1.0).contains(&epsilon) {
                    return Err(BanditError::Config(format!(
                        "epsilon must lie in [0, 1], got {epsilon}"
                    )));
                }
            }
            PolicyKind::ThompsonSampling { ensemble_size } => {
                if ensemble_size == 0 {
                    return Err(BanditError::Config(
                        "ensemble_size must be at least 1".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> BanditResult<()> {
        if !self.reward_noise.is_finite() || self.reward_noise < 0.0 {
            return Err(BanditError::Config(format!(
                "reward_noise must be a finite, non-negative standard deviation, got {}",
                self.reward_noise
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn validate(&self) -> BanditResult<()> {
        self.bandit.validate()?;
        self.simulation.validate()
    }

    /// Load configuration from environment variables, e.g.
    /// `RECLOOP__BANDIT__NUM_ACTIONS=5` or `RECLOOP__BANDIT__POLICY__TYPE=greedy`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("RECLOOP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app: AppConfig = config.try_deserialize()?;
        app.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        tracing::debug!(
            num_features = app.bandit.num_features,
            num_actions = app.bandit.num_actions,
            policy = app.bandit.policy.name(),
            "configuration loaded"
        );
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.bandit.validate().is_ok());
        assert_eq!(config.bandit.num_actions, 10);
        assert_eq!(
            config.bandit.policy,
            PolicyKind::ThompsonSampling { ensemble_size: 20 }
        );
    }

    #[test]
    fn test_validate_rejects_bad_epsilon() {
        for epsilon in [-0.1, 1.5, f64::NAN] {
            let config = BanditConfig::new(3, 2, PolicyKind::EpsilonGreedy { epsilon });
            assert!(matches!(config.validate(), Err(BanditError::Config(_))));
        }
        let config = BanditConfig::new(3, 2, PolicyKind::EpsilonGreedy { epsilon: 1.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_shapes() {
        assert!(BanditConfig::new(0, 2, PolicyKind::Greedy).validate().is_err());
        assert!(BanditConfig::new(2, 0, PolicyKind::Greedy).validate().is_err());
        assert!(
            BanditConfig::new(2, 2, PolicyKind::ThompsonSampling { ensemble_size: 0 })
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_simulation_rejects_bad_reward_noise() {
        for reward_noise in [-1.0, f64::NAN, f64::INFINITY] {
            let config = AppConfig {
                simulation: SimulationConfig {
                    reward_noise,
                    ..SimulationConfig::default()
                },
                ..AppConfig::default()
            };
            assert!(matches!(config.validate(), Err(BanditError::Config(_))));
        }

        let noiseless = SimulationConfig {
            reward_noise: 0.0,
            ..SimulationConfig::default()
        };
        assert!(noiseless.validate().is_ok());
    }

    #[test]
    fn test_load_fails_on_invalid_environment() {
        std::env::set_var("RECLOOP__SIMULATION__REWARD_NOISE", "-1.0");
        let result = AppConfig::load();
        std::env::remove_var("RECLOOP__SIMULATION__REWARD_NOISE");
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_kind_tagged_json() {
        let kind: PolicyKind =
            serde_json::from_str(r#"{"type":"epsilon_greedy","epsilon":0.2}"#).unwrap();
        assert_eq!(kind, PolicyKind::EpsilonGreedy { epsilon: 0.2 });

        let kind: PolicyKind = serde_json::from_str(r#"{"type":"greedy"}"#).unwrap();
        assert_eq!(kind.name(), "greedy");
    }

    #[test]
    fn test_bandit_config_fills_defaults() {
        let config: BanditConfig = serde_json::from_str(r#"{"num_actions":3}"#).unwrap();
        assert_eq!(config.num_actions, 3);
        assert_eq!(config.num_features, 5);
    }
}
