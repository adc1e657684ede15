//! Tabu search execution engine.
//!
//! # Algorithm
//!
//! 1. Drop the sole origin from the candidates when there is one trip
//! 2. For each round:
//!    a. Pick a random non-tabu destination, then mark it tabu
//!    b. Sample `num_generations` date neighbors of the original trips
//!       sent to that destination
//!    c. Keep the cheapest solution per destination
//! 3. Rank destinations by their cheapest solution
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info, warn};

use super::config::TabuConfig;
use crate::error::{AlgorithmError, SearchError};
use crate::random::rng_from;
use crate::stop::StopSignal;
use crate::travel::{Algorithm, DestinationBoard, Recommendation, TravelProblem};

/// Result of a tabu search run.
#[derive(Debug, Clone)]
pub struct TabuResult {
    /// Up to three destinations, cheapest first.
    pub recommendations: Vec<Recommendation>,
    /// Rounds executed.
    pub iterations: usize,
    /// Candidate solutions costed.
    pub evaluations: usize,
    /// Best cost after each round.
    pub cost_history: Vec<f64>,
}

/// Tabu search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes tabu search on the given problem.
    pub fn run(problem: &TravelProblem, config: &TabuConfig) -> Result<TabuResult, AlgorithmError> {
        Self::run_with_stop(problem, config, &StopSignal::new())
    }

    /// Executes tabu search, checking `stop` before every round.
    pub fn run_with_stop(
        problem: &TravelProblem,
        config: &TabuConfig,
        stop: &StopSignal,
    ) -> Result<TabuResult, AlgorithmError> {
        Self::search(problem, config, stop)
            .map_err(AlgorithmError::Tabu)
            .inspect_err(|err| warn!(error = %err, cause = %err.search_error(), "tabu search failed"))
    }

    fn search(
        problem: &TravelProblem,
        config: &TabuConfig,
        stop: &StopSignal,
    ) -> Result<TabuResult, SearchError> {
        config.validate()?;
        let candidates = problem.candidate_destinations();
        if candidates.is_empty() {
            return Err(SearchError::NoDestinations);
        }
        info!(
            destinations = candidates.len(),
            iterations = config.iterations,
            "starting tabu search"
        );

        let mut rng = rng_from(config.seed);
        let mut board = DestinationBoard::new();
        // Candidate indices, oldest pick first
        let mut tabu: VecDeque<usize> = VecDeque::with_capacity(config.tabu_tenure);
        let mut cost_history = Vec::with_capacity(config.iterations);
        let mut best_cost = f64::INFINITY;
        let mut evaluations = 0;

        for iteration in 0..config.iterations {
            if stop.is_stopped() {
                return Err(SearchError::Cancelled);
            }

            let pick = pick_destination(candidates.len(), &tabu, &mut rng);
            if config.tabu_tenure > 0 {
                if tabu.len() >= config.tabu_tenure {
                    tabu.pop_front();
                }
                tabu.push_back(pick);
            }
            let destination = candidates[pick].as_str();

            for _ in 0..config.num_generations {
                let candidate = problem
                    .neighbors()
                    .neighbor(problem.trips(), destination, &mut rng);
                let (cost, details) = problem.evaluate(&candidate)?;
                evaluations += 1;
                board.offer(destination, cost, details);
                best_cost = best_cost.min(cost);
            }

            cost_history.push(best_cost);
            debug!(iteration, destination, best_cost, "tabu round finished");
        }

        let recommendations = board.into_recommendations(Algorithm::TabuSearch);
        info!(
            best = recommendations.first().map(|r| r.destination.as_str()),
            evaluations, "tabu search finished"
        );
        Ok(TabuResult {
            recommendations,
            iterations: cost_history.len(),
            evaluations,
            cost_history,
        })
    }
}

/// Uniform pick among non-tabu indices; uniform over all when every index
/// is tabu.
fn pick_destination<R: Rng>(len: usize, tabu: &VecDeque<usize>, rng: &mut R) -> usize {
    let allowed: Vec<usize> = (0..len).filter(|i| !tabu.contains(i)).collect();
    if allowed.is_empty() {
        rng.random_range(0..len)
    } else {
        allowed[rng.random_range(0..allowed.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::travel::test_fixtures::{day, destinations, merged_history, seattle_trip};
    use crate::travel::{CostModel, Trip};

    fn problem(flex_days: u32) -> TravelProblem {
        TravelProblem::new(
            seattle_trip(),
            destinations(),
            flex_days,
            CostModel::standard(),
            merged_history(),
        )
        .unwrap()
    }

    fn config() -> TabuConfig {
        TabuConfig::default()
            .with_iterations(50)
            .with_num_generations(5)
            .with_seed(42)
    }

    #[test]
    fn test_tabu_prefers_cheapest_destination() {
        let result = TabuRunner::run(&problem(1), &config()).unwrap();

        let recs = &result.recommendations;
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].destination, "NYC");
        assert_eq!(recs[0].overall_cost, 5470.0);
        assert_eq!(recs[0].algorithm, Algorithm::TabuSearch);
        assert_eq!(recs[1].destination, "Seattle");
        assert_eq!(recs[1].overall_cost, 5605.0);
        assert_eq!(result.evaluations, 250);
    }

    #[test]
    fn test_tabu_cost_history_non_increasing() {
        let result = TabuRunner::run(&problem(1), &config()).unwrap();
        assert_eq!(result.iterations, 50);
        for window in result.cost_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn test_tabu_seeded_runs_are_reproducible() {
        let a = TabuRunner::run(&problem(2), &config()).unwrap();
        let b = TabuRunner::run(&problem(2), &config()).unwrap();
        assert_eq!(a.recommendations, b.recommendations);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_tabu_tenure_forces_exploration() {
        let config = TabuConfig::default()
            .with_iterations(2)
            .with_num_generations(1)
            .with_tabu_tenure(1)
            .with_seed(7);
        let result = TabuRunner::run(&problem(0), &config).unwrap();
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.recommendations[0].overall_cost, 5470.0);
    }

    #[test]
    fn test_pick_avoids_tabu_indices() {
        let mut rng = create_rng(1);
        let tabu: VecDeque<usize> = [0, 2].into_iter().collect();
        for _ in 0..20 {
            assert_eq!(pick_destination(3, &tabu, &mut rng), 1);
        }
        let all: VecDeque<usize> = [0, 1].into_iter().collect();
        assert!(pick_destination(2, &all, &mut rng) < 2);
    }

    #[test]
    fn test_tabu_without_candidates_fails() {
        let problem = TravelProblem::new(
            seattle_trip(),
            vec!["Chicago".into()],
            1,
            CostModel::standard(),
            merged_history(),
        )
        .unwrap();
        let err = TabuRunner::run(&problem, &config()).unwrap_err();
        assert_eq!(err, AlgorithmError::Tabu(SearchError::NoDestinations));
    }

    #[test]
    fn test_tabu_cancelled() {
        let stop = StopSignal::new();
        stop.cancel();
        let err = TabuRunner::run_with_stop(&problem(1), &config(), &stop).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_tabu_invalid_config() {
        let err = TabuRunner::run(&problem(1), &config().with_num_generations(0)).unwrap_err();
        assert!(matches!(err.search_error(), SearchError::Config(_)));
    }

    #[test]
    fn test_tabu_groups_share_destination() {
        let trips = vec![
            Trip::new("Chicago", "Seattle", day(3), day(4), 1),
            Trip::new("Seattle", "Seattle", day(3), day(4), 2),
        ];
        let problem =
            TravelProblem::new(trips, destinations(), 0, CostModel::standard(), merged_history()).unwrap();
        let result = TabuRunner::run(&problem, &config()).unwrap();
        for rec in &result.recommendations {
            assert_eq!(rec.details.len(), 2);
            assert!(rec.details.iter().all(|d| d.trip.destination.admits(&rec.destination)));
        }
        let seattle = result
            .recommendations
            .iter()
            .find(|r| r.destination == "Seattle")
            .unwrap();
        assert_eq!(seattle.details[1].trip_cost, 0.0);
    }
}
