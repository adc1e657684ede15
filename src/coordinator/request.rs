//! Request-level entry point.
//!
//! [`OptimizationRequest`] carries what a caller asks for: the trips, an
//! optional budget, the flex window and optionally the destinations and
//! algorithms to use. [`TravelOptimization`] owns the price history and
//! settings, builds a [`TravelProblem`] per request and runs the
//! [`ConcurrentCoordinator`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::OptimizationConfig;
use super::runner::ConcurrentCoordinator;
use crate::error::ConcurrentOptimizationError;
use crate::stop::StopSignal;
use crate::travel::{Algorithm, CostModel, PriceHistory, Recommendation, TravelProblem, Trip};

/// One optimization request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationRequest {
    /// Trips to place.
    pub trips: Vec<Trip>,

    /// Spending limit. Results above it are reported, not dropped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub budget: Option<f64>,

    /// Days the dates may move before the start and after the end.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flex_days: u32,

    /// Destinations to consider; defaults to every trip's choices.
    #[cfg_attr(feature = "serde", serde(default))]
    pub potential_destinations: Option<Vec<String>>,

    /// Algorithms to run; empty uses the configured ones.
    #[cfg_attr(feature = "serde", serde(default))]
    pub algorithms: Vec<Algorithm>,
}

impl OptimizationRequest {
    /// Creates a request for `trips` with no flex and default settings.
    pub fn new(trips: Vec<Trip>) -> Self {
        Self {
            trips,
            budget: None,
            flex_days: 0,
            potential_destinations: None,
            algorithms: Vec::new(),
        }
    }

    /// Sets the budget.
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Sets the flex window.
    pub fn with_flex_days(mut self, days: u32) -> Self {
        self.flex_days = days;
        self
    }

    /// Restricts the destinations.
    pub fn with_potential_destinations<I, S>(mut self, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.potential_destinations = Some(destinations.into_iter().map(Into::into).collect());
        self
    }

    /// Selects the algorithms.
    pub fn with_algorithms(mut self, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        self.algorithms = algorithms.into_iter().collect();
        self
    }

    /// The requested destinations, or the union of the trips' choices in
    /// first-seen order.
    pub fn destinations(&self) -> Vec<String> {
        if let Some(destinations) = &self.potential_destinations {
            return destinations.clone();
        }
        let mut union: Vec<String> = Vec::new();
        for city in self.trips.iter().flat_map(|t| t.destination.choices()) {
            if !union.contains(city) {
                union.push(city.clone());
            }
        }
        union
    }
}

/// Price history plus settings; answers [`OptimizationRequest`]s.
///
/// ```no_run
/// use whatif_optim::coordinator::{OptimizationRequest, TravelOptimization};
/// use whatif_optim::travel::PriceHistory;
///
/// # fn load() -> (PriceHistory, Vec<whatif_optim::travel::Trip>) { unimplemented!() }
/// let (history, trips) = load();
/// let optimizer = TravelOptimization::new(history);
/// let request = OptimizationRequest::new(trips).with_flex_days(2).with_budget(3000.0);
/// let recommendations = optimizer.get_best_recommendations(&request)?;
/// # Ok::<(), whatif_optim::error::ConcurrentOptimizationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TravelOptimization {
    history: PriceHistory,
    cost_model: CostModel,
    config: OptimizationConfig,
}

impl TravelOptimization {
    /// Uses the standard cost model and default settings.
    pub fn new(history: PriceHistory) -> Self {
        Self {
            history,
            cost_model: CostModel::standard(),
            config: OptimizationConfig::default(),
        }
    }

    /// Replaces the cost model.
    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Replaces the settings.
    pub fn with_config(mut self, config: OptimizationConfig) -> Self {
        self.config = config;
        self
    }

    /// Current settings.
    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// Runs the requested algorithms and returns the reconciled ranking.
    pub fn get_best_recommendations(
        &self,
        request: &OptimizationRequest,
    ) -> Result<Vec<Recommendation>, ConcurrentOptimizationError> {
        self.get_best_recommendations_with_stop(request, &StopSignal::new())
    }

    /// Like [`get_best_recommendations`](Self::get_best_recommendations),
    /// honoring `stop`.
    pub fn get_best_recommendations_with_stop(
        &self,
        request: &OptimizationRequest,
        stop: &StopSignal,
    ) -> Result<Vec<Recommendation>, ConcurrentOptimizationError> {
        let destinations = request.destinations();
        info!(
            trips = request.trips.len(),
            destinations = destinations.len(),
            flex_days = request.flex_days,
            "optimization request received"
        );
        let problem = TravelProblem::new(
            request.trips.clone(),
            destinations,
            request.flex_days,
            self.cost_model.clone(),
            self.history.clone(),
        )?;

        let mut config = self.config.clone();
        if !request.algorithms.is_empty() {
            config.coordinator.algorithms = request.algorithms.clone();
        }
        let recommendations = ConcurrentCoordinator::run_with_stop(&problem, &config, stop)?;

        if let Some(budget) = request.budget {
            for over in recommendations.iter().filter(|r| r.overall_cost > budget) {
                warn!(
                    destination = %over.destination,
                    cost = over.overall_cost,
                    budget,
                    "recommendation exceeds budget"
                );
            }
        }
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::CoordinatorConfig;
    use crate::error::InputValidationError;
    use crate::tabu::TabuConfig;
    use crate::travel::test_fixtures::{day, merged_history};

    fn optimizer() -> TravelOptimization {
        TravelOptimization::new(merged_history()).with_config(
            OptimizationConfig::default()
                .with_tabu(TabuConfig::default().with_iterations(40).with_num_generations(5))
                .with_coordinator(CoordinatorConfig::default().with_max_workers(2).with_seed(3)),
        )
    }

    fn open_trip() -> Trip {
        Trip::new("Chicago", vec!["Seattle", "NYC"], day(3), day(4), 1)
    }

    #[test]
    fn test_destinations_default_to_trip_choices() {
        let request = OptimizationRequest::new(vec![
            open_trip(),
            Trip::new("Seattle", "NYC", day(3), day(4), 1),
        ]);
        assert_eq!(request.destinations(), vec!["Seattle".to_string(), "NYC".to_string()]);

        let request = request.with_potential_destinations(["Boston"]);
        assert_eq!(request.destinations(), vec!["Boston".to_string()]);
    }

    #[test]
    fn test_best_recommendation_for_open_trip() {
        let request = OptimizationRequest::new(vec![open_trip()])
            .with_flex_days(1)
            .with_algorithms([Algorithm::TabuSearch])
            .with_budget(1000.0);
        let recs = optimizer().get_best_recommendations(&request).unwrap();

        assert_eq!(recs[0].rank, 1);
        assert_eq!(recs[0].destination, "NYC");
        assert_eq!(recs[0].overall_cost, 5470.0);
        assert!(recs.iter().all(|r| r.algorithm == Algorithm::TabuSearch));
    }

    #[test]
    fn test_configured_algorithms_used_by_default() {
        let request = OptimizationRequest::new(vec![open_trip()]).with_flex_days(1);
        let recs = optimizer().get_best_recommendations(&request).unwrap();
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.algorithm != Algorithm::GeneticAlgorithm));
    }

    #[test]
    fn test_empty_request_rejected() {
        let err = optimizer()
            .get_best_recommendations(&OptimizationRequest::new(Vec::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConcurrentOptimizationError::InvalidRequest(InputValidationError::NoTrips)
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "trips": [{
                "origin": "Chicago",
                "destination": ["Seattle", "NYC"],
                "start_date": "2024-04-03",
                "end_date": "2024-04-04",
                "num_travelers": 1
            }],
            "budget": 6000.0,
            "flex_days": 1,
            "algorithms": ["Tabu Search", "Annealing"]
        }"#;
        let request: OptimizationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.trips, vec![open_trip()]);
        assert_eq!(request.algorithms, vec![Algorithm::TabuSearch, Algorithm::Annealing]);
        assert!(request.potential_destinations.is_none());
    }
}
