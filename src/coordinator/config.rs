//! Coordinator configuration.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ga::GaConfig;
use crate::sa::SaConfig;
use crate::tabu::TabuConfig;
use crate::travel::Algorithm;

/// How the coordinator fans out algorithm runs.
///
/// ```
/// use std::time::Duration;
/// use whatif_optim::coordinator::CoordinatorConfig;
/// use whatif_optim::travel::Algorithm;
///
/// let config = CoordinatorConfig::default()
///     .with_algorithms([Algorithm::GeneticAlgorithm])
///     .with_repetitions(3)
///     .with_timeout(Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.task_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CoordinatorConfig {
    /// Algorithms to run, in submission order.
    pub algorithms: Vec<Algorithm>,

    /// Runs per algorithm.
    pub repetitions: usize,

    /// Worker threads in the pool.
    pub max_workers: usize,

    /// Wall-clock limit for the whole coordinated run.
    pub timeout: Option<Duration>,

    /// Base seed; task `i` runs with `seed + i`.
    ///
    /// `None` keeps each algorithm's own seed.
    pub seed: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            algorithms: vec![Algorithm::TabuSearch, Algorithm::Annealing],
            repetitions: 1,
            max_workers: 12,
            timeout: None,
            seed: None,
        }
    }
}

impl CoordinatorConfig {
    /// Sets the algorithms to run.
    pub fn with_algorithms(mut self, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        self.algorithms = algorithms.into_iter().collect();
        self
    }

    /// Sets the runs per algorithm.
    pub fn with_repetitions(mut self, n: usize) -> Self {
        self.repetitions = n;
        self
    }

    /// Sets the pool size.
    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n;
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of tasks one run submits.
    pub fn task_count(&self) -> usize {
        self.algorithms.len() * self.repetitions
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.algorithms.is_empty() {
            return Err(ConfigError::new("algorithms", "must name at least one algorithm"));
        }
        if self.repetitions == 0 {
            return Err(ConfigError::new("repetitions", "must be at least 1"));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::new("max_workers", "must be at least 1"));
        }
        Ok(())
    }
}

/// Every tunable of a coordinated run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct OptimizationConfig {
    /// Tabu search settings.
    pub tabu: TabuConfig,
    /// Simulated annealing settings.
    pub annealing: SaConfig,
    /// Genetic algorithm settings.
    pub genetic: GaConfig,
    /// Fan-out settings.
    pub coordinator: CoordinatorConfig,
}

impl OptimizationConfig {
    /// Replaces the tabu settings.
    pub fn with_tabu(mut self, tabu: TabuConfig) -> Self {
        self.tabu = tabu;
        self
    }

    /// Replaces the annealing settings.
    pub fn with_annealing(mut self, annealing: SaConfig) -> Self {
        self.annealing = annealing;
        self
    }

    /// Replaces the genetic settings.
    pub fn with_genetic(mut self, genetic: GaConfig) -> Self {
        self.genetic = genetic;
        self
    }

    /// Replaces the coordinator settings.
    pub fn with_coordinator(mut self, coordinator: CoordinatorConfig) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Validates the coordinator and every selected algorithm's settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.coordinator.validate()?;
        for algorithm in &self.coordinator.algorithms {
            match algorithm {
                Algorithm::TabuSearch => self.tabu.validate()?,
                Algorithm::Annealing => self.annealing.validate()?,
                Algorithm::GeneticAlgorithm => self.genetic.validate()?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.algorithms, vec![Algorithm::TabuSearch, Algorithm::Annealing]);
        assert_eq!(config.repetitions, 1);
        assert_eq!(config.max_workers, 12);
        assert!(config.timeout.is_none());
        assert!(OptimizationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_coordinator() {
        let config = CoordinatorConfig::default().with_algorithms([]);
        assert!(matches!(config.validate(), Err(ConfigError { field: "algorithms", .. })));
        let config = CoordinatorConfig::default().with_max_workers(0);
        assert!(matches!(config.validate(), Err(ConfigError { field: "max_workers", .. })));
    }

    #[test]
    fn test_only_selected_algorithms_validated() {
        let config = OptimizationConfig::default().with_genetic(GaConfig::default().with_generations(0));
        assert!(config.validate().is_ok());

        let config = config.with_coordinator(
            CoordinatorConfig::default().with_algorithms([Algorithm::GeneticAlgorithm]),
        );
        assert!(matches!(config.validate(), Err(ConfigError { field: "generations", .. })));
    }
}
