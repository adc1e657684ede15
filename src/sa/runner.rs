//! SA execution loop.

use rand::Rng;
use tracing::{debug, info, warn};

use super::config::SaConfig;
use crate::error::{AlgorithmError, SearchError};
use crate::random::rng_from;
use crate::stop::StopSignal;
use crate::travel::{Algorithm, DestinationBoard, Recommendation, Trip, TravelProblem};

/// Result of a simulated annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// Up to three accepted destinations, cheapest first.
    pub recommendations: Vec<Recommendation>,

    /// Total number of proposals (one per temperature step).
    pub steps: usize,

    /// Number of accepted moves.
    pub accepted_moves: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Destination the trajectory started from.
    pub start_destination: String,
}

/// Executes the simulated annealing search.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    pub fn run(problem: &TravelProblem, config: &SaConfig) -> Result<SaResult, AlgorithmError> {
        Self::run_with_stop(problem, config, &StopSignal::new())
    }

    /// Runs SA, checking `stop` before every step.
    pub fn run_with_stop(
        problem: &TravelProblem,
        config: &SaConfig,
        stop: &StopSignal,
    ) -> Result<SaResult, AlgorithmError> {
        Self::search(problem, config, stop)
            .map_err(AlgorithmError::Annealing)
            .inspect_err(|err| warn!(error = %err, cause = %err.search_error(), "annealing failed"))
    }

    fn search(
        problem: &TravelProblem,
        config: &SaConfig,
        stop: &StopSignal,
    ) -> Result<SaResult, SearchError> {
        config.validate()?;
        let candidates = problem.candidate_destinations();
        if candidates.is_empty() {
            return Err(SearchError::NoDestinations);
        }
        let mut rng = rng_from(config.seed);

        // Start where every trip may go, else at the first candidate
        let common = problem.common_destinations(&candidates);
        let start_destination = if common.is_empty() {
            candidates[0].clone()
        } else {
            common[rng.random_range(0..common.len())].clone()
        };
        info!(
            start = %start_destination,
            steps = config.steps(),
            "starting simulated annealing"
        );

        let mut current: Vec<Trip> = problem
            .trips()
            .iter()
            .map(|trip| trip.with_destination(&start_destination))
            .collect();
        let (mut current_cost, _) = problem.evaluate(&current)?;

        let mut board = DestinationBoard::new();
        let mut temperature = config.initial_temperature;
        let mut steps = 0usize;
        let mut accepted_moves = 0usize;

        while temperature > config.min_temperature {
            if stop.is_stopped() {
                return Err(SearchError::Cancelled);
            }

            let destination = candidates[rng.random_range(0..candidates.len())].as_str();
            let proposal = problem.neighbors().neighbor(&current, destination, &mut rng);
            let (cost, details) = problem.evaluate(&proposal)?;
            let delta = cost - current_cost;

            // Metropolis acceptance criterion
            let accept = delta <= 0.0 || rng.random::<f64>() < (-delta / temperature).exp();
            if accept {
                board.offer(destination, cost, details);
                current = proposal;
                current_cost = cost;
                accepted_moves += 1;
            }
            debug!(step = steps, temperature, destination, cost, accept, "annealing step");

            steps += 1;
            temperature *= config.cooling_rate;
        }

        let recommendations = board.into_recommendations(Algorithm::Annealing);
        info!(steps, accepted_moves, "simulated annealing finished");
        Ok(SaResult {
            recommendations,
            steps,
            accepted_moves,
            final_temperature: temperature,
            start_destination,
        })
    }
}
