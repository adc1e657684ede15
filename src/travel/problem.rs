//! Shared input of the travel search procedures.

use super::cost::{CostModel, CostRecord};
use super::history::PriceHistory;
use super::neighbor::NeighborGenerator;
use super::trip::Trip;
use crate::error::{InputValidationError, TripCalculationError};

/// Trips to place, candidate destinations, flex budget, cost model and
/// price history.
///
/// Every search procedure reads the problem through a shared reference and
/// derives new trips from it; nothing mutates it during a run. Cloning
/// copies the price history, so clones handed to concurrent tasks share no
/// data.
#[derive(Debug, Clone)]
pub struct TravelProblem {
    trips: Vec<Trip>,
    destinations: Vec<String>,
    neighbors: NeighborGenerator,
    cost_model: CostModel,
    history: PriceHistory,
}

impl TravelProblem {
    /// Creates a problem after validating every trip.
    pub fn new(
        trips: Vec<Trip>,
        destinations: Vec<String>,
        flex_days: u32,
        cost_model: CostModel,
        history: PriceHistory,
    ) -> Result<Self, InputValidationError> {
        if trips.is_empty() {
            return Err(InputValidationError::NoTrips);
        }
        for trip in &trips {
            trip.validate()?;
        }
        Ok(Self {
            trips,
            destinations,
            neighbors: NeighborGenerator::new(flex_days),
            cost_model,
            history,
        })
    }

    /// The trips as given.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Destinations as given.
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Flex-days budget.
    pub fn flex_days(&self) -> u32 {
        self.neighbors.flex_days()
    }

    /// Neighbor generator for the flex budget.
    pub fn neighbors(&self) -> &NeighborGenerator {
        &self.neighbors
    }

    /// Cost model.
    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Price history.
    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Destinations the searches explore.
    ///
    /// A single trip is never sent to its own origin.
    pub fn candidate_destinations(&self) -> Vec<String> {
        match self.trips.as_slice() {
            [only] => self
                .destinations
                .iter()
                .filter(|d| **d != only.origin)
                .cloned()
                .collect(),
            _ => self.destinations.clone(),
        }
    }

    /// Candidates every trip individually admits, in candidate order.
    pub fn common_destinations(&self, candidates: &[String]) -> Vec<String> {
        candidates
            .iter()
            .filter(|c| self.trips.iter().all(|t| t.destination.admits(c)))
            .cloned()
            .collect()
    }

    /// Combined cost and per-trip records of a set of trips.
    pub fn evaluate(&self, trips: &[Trip]) -> Result<(f64, Vec<CostRecord>), TripCalculationError> {
        self.cost_model.evaluate(trips, &self.history)
    }
}
