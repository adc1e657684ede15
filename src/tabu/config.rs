//! Tabu search configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration parameters for tabu search.
///
/// # Examples
///
/// ```
/// use whatif_optim::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_iterations(50)
///     .with_num_generations(5)
///     .with_tabu_tenure(1);
/// assert_eq!(config.iterations, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TabuConfig {
    /// Number of rounds (one destination pick each).
    pub iterations: usize,
    /// Neighbors sampled per round.
    pub num_generations: usize,
    /// Rounds a picked destination stays excluded from the pick (0 disables
    /// the tabu list).
    pub tabu_tenure: usize,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            num_generations: 20,
            tabu_tenure: 0,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the number of rounds.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the neighbors sampled per round.
    pub fn with_num_generations(mut self, n: usize) -> Self {
        self.num_generations = n;
        self
    }

    /// Sets the tabu tenure.
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::new("iterations", "must be at least 1"));
        }
        if self.num_generations == 0 {
            return Err(ConfigError::new("num_generations", "must be at least 1"));
        }
        Ok(())
    }
}
