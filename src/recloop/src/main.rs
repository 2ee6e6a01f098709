//! recloop: runs the offline-fit / online-decide bandit loop against a
//! synthetic linear reward environment and reports how each exploration
//! strategy fares period over period.

mod world;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use recloop_core::config::AppConfig;
use recloop_core::{Log, PolicyKind};
use recloop_rl_engine::{BanditPolicy, Policy};
use serde::Serialize;
use tracing::info;
use world::SyntheticWorld;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Greedy,
    EpsilonGreedy,
    Thompson,
}

#[derive(Parser, Debug)]
#[command(name = "recloop")]
#[command(about = "Contextual-bandit recommendation loop simulator")]
#[command(version)]
struct Cli {
    /// Number of fit/decide periods (overrides config)
    #[arg(long, env = "RECLOOP__SIMULATION__PERIODS")]
    periods: Option<usize>,

    /// Decisions made in each period (overrides config)
    #[arg(long, env = "RECLOOP__SIMULATION__DECISIONS_PER_PERIOD")]
    decisions_per_period: Option<usize>,

    /// Random seed for the world and the policy (overrides config)
    #[arg(long, env = "RECLOOP__SIMULATION__SEED")]
    seed: Option<u64>,

    /// Exploration strategy (overrides config)
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Exploration rate for epsilon-greedy
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,

    /// Bootstrap ensemble size for Thompson sampling
    #[arg(long, default_value_t = 20)]
    ensemble_size: usize,
}

#[derive(Debug, Serialize)]
struct PeriodReport {
    period: usize,
    mean_reward: f64,
    oracle_mean_reward: f64,
    action_share: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct Summary {
    policy: &'static str,
    num_features: usize,
    num_actions: usize,
    periods: Vec<PeriodReport>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recloop=info,recloop_rl_engine=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    // Unset variables already fall back to defaults; anything that fails to
    // parse or validate is a hard error rather than a silent reset.
    let mut config = AppConfig::load().context("invalid RECLOOP__ configuration")?;

    if let Some(periods) = cli.periods {
        config.simulation.periods = periods;
    }
    if let Some(n) = cli.decisions_per_period {
        config.simulation.decisions_per_period = n;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = seed;
    }
    if let Some(policy) = cli.policy {
        config.bandit.policy = match policy {
            PolicyArg::Greedy => PolicyKind::Greedy,
            PolicyArg::EpsilonGreedy => PolicyKind::EpsilonGreedy {
                epsilon: cli.epsilon,
            },
            PolicyArg::Thompson => PolicyKind::ThompsonSampling {
                ensemble_size: cli.ensemble_size,
            },
        };
    }

    config.validate().context("invalid configuration after CLI overrides")?;

    info!(
        policy = config.bandit.policy.name(),
        num_features = config.bandit.num_features,
        num_actions = config.bandit.num_actions,
        periods = config.simulation.periods,
        decisions_per_period = config.simulation.decisions_per_period,
        seed = config.simulation.seed,
        "Configuration loaded"
    );

    let policy = BanditPolicy::from_config(&config.bandit)?;
    let mut rng = StdRng::seed_from_u64(config.simulation.seed);
    let world = SyntheticWorld::new(
        config.bandit.num_features,
        config.bandit.num_actions,
        config.simulation.reward_noise,
        &mut rng,
    )?;

    // First period runs on random coefficients.
    policy.reset(&mut rng);

    let num_actions = config.bandit.num_actions;
    let mut reports = Vec::with_capacity(config.simulation.periods);
    for period in 0..config.simulation.periods {
        let mut log = Log::with_capacity(config.simulation.decisions_per_period);
        let mut oracle_total = 0.0;
        let mut counts = vec![0usize; num_actions];

        for _ in 0..config.simulation.decisions_per_period {
            let context = world.draw_context(&mut rng);
            let action = policy.decide(&context, &mut rng)?;
            let reward = world.reward(&context, action, &mut rng);
            oracle_total += world.best_expected_reward(&context);
            counts[action] += 1;
            log.record(context, action, reward);
        }

        let n = log.len().max(1) as f64;
        let mean_reward = log.iter().map(|s| s.reward).sum::<f64>() / n;
        let report = PeriodReport {
            period,
            mean_reward,
            oracle_mean_reward: oracle_total / n,
            action_share: counts.iter().map(|&c| c as f64 / n).collect(),
        };
        info!(
            period,
            mean_reward = report.mean_reward,
            oracle_mean_reward = report.oracle_mean_reward,
            "Period complete"
        );
        reports.push(report);

        policy.fit_offline(&log, &mut rng)?;
    }

    let summary = Summary {
        policy: policy.name(),
        num_features: config.bandit.num_features,
        num_actions,
        periods: reports,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
