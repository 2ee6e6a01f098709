//! Synthetic environment: rewards are linear in the context with a hidden
//! coefficient vector per action, plus Gaussian noise.

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError, StandardNormal};
use recloop_core::{Action, Context};

pub struct SyntheticWorld {
    true_betas: Vec<Vec<f64>>,
    noise: Normal<f64>,
}

impl SyntheticWorld {
    pub fn new<R: Rng + ?Sized>(
        num_features: usize,
        num_actions: usize,
        reward_noise: f64,
        rng: &mut R,
    ) -> Result<Self, NormalError> {
        let true_betas = (0..num_actions)
            .map(|_| {
                (0..num_features)
                    .map(|_| rng.sample::<f64, _>(StandardNormal))
                    .collect()
            })
            .collect();
        let noise = Normal::new(0.0, reward_noise)?;
        Ok(Self { true_betas, noise })
    }

    /// Users are one-hot segment memberships.
    pub fn draw_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Context {
        let num_features = self.true_betas.first().map(|b| b.len()).unwrap_or(0);
        let mut context = vec![0.0; num_features];
        if num_features > 0 {
            context[rng.gen_range(0..num_features)] = 1.0;
        }
        context
    }

    pub fn expected_reward(&self, context: &[f64], action: Action) -> f64 {
        self.true_betas[action]
            .iter()
            .zip(context)
            .map(|(b, x)| b * x)
            .sum()
    }

    pub fn best_expected_reward(&self, context: &[f64]) -> f64 {
        (0..self.true_betas.len())
            .map(|a| self.expected_reward(context, a))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn reward<R: Rng + ?Sized>(&self, context: &[f64], action: Action, rng: &mut R) -> f64 {
        self.expected_reward(context, action) + self.noise.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_contexts_are_one_hot() {
        let mut rng = StdRng::seed_from_u64(1);
        let world = SyntheticWorld::new(4, 3, 0.1, &mut rng).unwrap();
        for _ in 0..50 {
            let context = world.draw_context(&mut rng);
            assert_eq!(context.len(), 4);
            assert_eq!(context.iter().sum::<f64>(), 1.0);
        }
    }

    #[test]
    fn test_noiseless_reward_is_expected_reward() {
        let mut rng = StdRng::seed_from_u64(2);
        let world = SyntheticWorld::new(3, 2, 0.0, &mut rng).unwrap();
        let context = [0.0, 1.0, 0.0];
        assert_eq!(
            world.reward(&context, 1, &mut rng),
            world.expected_reward(&context, 1)
        );
        assert!(world.best_expected_reward(&context) >= world.expected_reward(&context, 0));
    }

    #[test]
    fn test_non_finite_noise_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(SyntheticWorld::new(3, 2, f64::NAN, &mut rng).is_err());
    }
}
