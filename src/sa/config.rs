//! SA configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the simulated annealing search.
///
/// Temperature cools geometrically: `T_{k+1} = cooling_rate * T_k`, and the
/// search stops once `T` is no longer above `min_temperature`.
///
/// # Examples
///
/// ```
/// use whatif_optim::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.5);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.steps(), 23);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SaConfig {
    /// Initial temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_rate: f64,

    /// The search stops when T drops to this value.
    pub min_temperature: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 200.0,
            cooling_rate: 0.1,
            min_temperature: 1e-4,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of annealing steps the schedule allows (0 for an invalid
    /// configuration).
    pub fn steps(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        let mut temperature = self.initial_temperature;
        let mut steps = 0;
        while temperature > self.min_temperature {
            temperature *= self.cooling_rate;
            steps += 1;
        }
        steps
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature > 0.0) || !self.initial_temperature.is_finite() {
            return Err(ConfigError::new("initial_temperature", "must be positive and finite"));
        }
        if !(self.min_temperature > 0.0) {
            return Err(ConfigError::new("min_temperature", "must be positive"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(ConfigError::new(
                "min_temperature",
                "must be less than initial_temperature",
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ConfigError::new(
                "cooling_rate",
                format!("must be in (0, 1), got {}", self.cooling_rate),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SaConfig::default();
        assert!((config.initial_temperature - 200.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.1).abs() < 1e-10);
        assert!((config.min_temperature - 1e-4).abs() < 1e-15);
        assert_eq!(config.steps(), 7);
    }

    #[test]
    fn test_validate_ok() {
        assert!(SaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = SaConfig::default().with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(20.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        for rate in [0.0, 1.0, 1.5, f64::NAN] {
            let config = SaConfig::default().with_cooling_rate(rate);
            assert!(
                matches!(config.validate(), Err(ConfigError { field: "cooling_rate", .. })),
                "rate {rate} should be rejected"
            );
        }
    }
}
