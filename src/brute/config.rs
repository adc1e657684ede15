//! Brute-force search configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InvalidCapacity;

/// Configuration for [`BruteForceRunner`](super::BruteForceRunner).
///
/// # Examples
///
/// ```
/// use whatif_optim::brute::BruteForceConfig;
///
/// let config = BruteForceConfig::new(["destination", "date_from", "date_to"])
///     .with_top_n(5);
/// assert_eq!(config.parameters.len(), 3);
/// assert_eq!(config.top_n, 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BruteForceConfig {
    /// Columns whose values are enumerated.
    pub parameters: Vec<String>,
    /// How many lowest-cost scenarios to return.
    pub top_n: usize,
    /// Score scenarios on the rayon pool (requires the `parallel` feature;
    /// ignored otherwise).
    pub parallel: bool,
}

impl BruteForceConfig {
    /// Creates a configuration enumerating `parameters`, returning 3 results.
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
            top_n: 3,
            parallel: false,
        }
    }

    /// Sets the number of returned scenarios.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Enables or disables parallel scenario scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), InvalidCapacity> {
        if self.top_n == 0 {
            return Err(InvalidCapacity(self.top_n));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BruteForceConfig::new(["a"]);
        assert_eq!(config.top_n, 3);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_top_n_invalid() {
        let config = BruteForceConfig::new(["a"]).with_top_n(0);
        assert_eq!(config.validate(), Err(InvalidCapacity(0)));
    }
}
