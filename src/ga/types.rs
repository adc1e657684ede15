//! Destination individuals and their fitness.

use crate::error::TripCalculationError;
use crate::travel::{CostRecord, TravelProblem};

/// A destination with the cost of its cheapest date variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// Destination every trip is sent to.
    pub destination: String,
    /// Cheapest non-zero variant cost, `+inf` when no variant qualifies.
    pub cost: f64,
    /// Per-trip records of the cheapest variant.
    pub details: Vec<CostRecord>,
}

impl Individual {
    /// Costs every date variant of the problem's trips sent to
    /// `destination` and keeps the cheapest.
    ///
    /// A variant costing exactly zero (every trip staying at its origin) is
    /// never kept: it counts as not evaluated.
    pub fn evaluate(problem: &TravelProblem, destination: &str) -> Result<Self, TripCalculationError> {
        let mut best = Self {
            destination: destination.to_owned(),
            cost: f64::INFINITY,
            details: Vec::new(),
        };
        for variant in problem
            .neighbors()
            .population_variants(problem.trips(), destination)
        {
            let (cost, details) = problem.evaluate(&variant)?;
            if cost < best.cost && cost != 0.0 {
                best.cost = cost;
                best.details = details;
            }
        }
        Ok(best)
    }

    /// Higher is better.
    pub fn fitness(&self) -> f64 {
        -self.cost
    }

    /// Whether some variant qualified.
    pub fn is_evaluated(&self) -> bool {
        self.cost.is_finite()
    }
}
