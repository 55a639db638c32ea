//! Epsilon-greedy exploration

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::utils::flip_coin;

/// Picks a uniformly random legal action with probability `epsilon`, the
/// greedy action otherwise.
///
/// The generator is owned by the policy so a seeded run is reproducible.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    /// Policy seeded from the operating system
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            rng: StdRng::from_entropy(),
        }
    }

    /// Policy with a fixed seed
    #[must_use]
    pub fn with_seed(epsilon: f64, seed: u64) -> Self {
        Self {
            epsilon,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current exploration probability
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Change the exploration probability
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Choose among `legal`; `greedy` is only called when exploiting.
    ///
    /// Returns `None` when `legal` is empty.
    pub fn select<A, F>(&mut self, legal: &[A], greedy: F) -> Option<A>
    where
        A: Clone,
        F: FnOnce() -> Option<A>,
    {
        if legal.is_empty() {
            return None;
        }
        if flip_coin(&mut self.rng, self.epsilon) {
            legal.choose(&mut self.rng).cloned()
        } else {
            greedy()
        }
    }
}
