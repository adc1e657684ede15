//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat,
//! then ranks the unique destinations of the whole fitness history.

use std::collections::HashMap;

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::GaConfig;
use super::operators::{choose_pair, crossover, mutate};
use super::selection::select_parents;
use super::types::Individual;
use crate::error::{AlgorithmError, SearchError};
use crate::random::rng_from;
use crate::stop::StopSignal;
use crate::travel::{Algorithm, DestinationBoard, Recommendation, TravelProblem};

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Up to three unique destinations, cheapest first.
    pub recommendations: Vec<Recommendation>,

    /// Total number of generations executed.
    pub generations: usize,

    /// Distinct destinations costed (each is costed once per run).
    pub evaluations: usize,

    /// Lowest cost in each generation's population.
    pub cost_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    pub fn run(problem: &TravelProblem, config: &GaConfig) -> Result<GaResult, AlgorithmError> {
        Self::run_with_stop(problem, config, &StopSignal::new())
    }

    /// Runs the GA, checking `stop` before every generation.
    pub fn run_with_stop(
        problem: &TravelProblem,
        config: &GaConfig,
        stop: &StopSignal,
    ) -> Result<GaResult, AlgorithmError> {
        Self::search(problem, config, stop)
            .map_err(AlgorithmError::Genetic)
            .inspect_err(|err| warn!(error = %err, cause = %err.search_error(), "genetic algorithm failed"))
    }

    fn search(
        problem: &TravelProblem,
        config: &GaConfig,
        stop: &StopSignal,
    ) -> Result<GaResult, SearchError> {
        config.validate()?;
        let candidates = problem.candidate_destinations();
        if candidates.is_empty() {
            return Err(SearchError::NoDestinations);
        }
        info!(
            population = config.population_size,
            generations = config.generations,
            "starting genetic algorithm"
        );

        let mut rng = rng_from(config.seed);

        // 1. Initialize population
        let mut population: Vec<String> = (0..config.population_size)
            .map(|_| candidates[rng.random_range(0..candidates.len())].clone())
            .collect();

        let mut cache: HashMap<String, Individual> = HashMap::new();
        let mut history: Vec<Individual> = Vec::new();
        let mut cost_history = Vec::with_capacity(config.generations);

        // 2. Evolutionary loop
        for generation in 0..config.generations {
            if stop.is_stopped() {
                return Err(SearchError::Cancelled);
            }

            let scored = evaluate_population(problem, &population, &mut cache, config.parallel)?;
            let generation_best = scored.iter().map(|i| i.cost).fold(f64::INFINITY, f64::min);
            cost_history.push(generation_best);
            debug!(generation, best = generation_best, "generation evaluated");

            let parents = select_parents(&scored);
            history.extend(scored);

            let mut next = Vec::with_capacity(config.population_size);
            while next.len() < config.population_size {
                let Some((p1, p2)) = choose_pair(&parents, &mut rng) else {
                    break;
                };
                let child = crossover(p1, p2, &mut rng);
                next.push(mutate(child, &candidates, config.mutation_rate, &mut rng));
            }
            population = next;
        }

        // 3. Unique destinations over the whole history, best cost first
        history.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        let mut board = DestinationBoard::new();
        for individual in history {
            if !board.contains(&individual.destination) {
                board.offer(&individual.destination, individual.cost, individual.details);
            }
            if board.len() == candidates.len() {
                break;
            }
        }

        let recommendations = board.into_recommendations(Algorithm::GeneticAlgorithm);
        info!(
            best = recommendations.first().map(|r| r.destination.as_str()),
            evaluations = cache.len(),
            "genetic algorithm finished"
        );
        Ok(GaResult {
            recommendations,
            generations: cost_history.len(),
            evaluations: cache.len(),
            cost_history,
        })
    }
}

/// Scores a population, costing each destination not yet in `cache` once.
fn evaluate_population(
    problem: &TravelProblem,
    population: &[String],
    cache: &mut HashMap<String, Individual>,
    parallel: bool,
) -> Result<Vec<Individual>, SearchError> {
    let mut missing: Vec<&str> = Vec::new();
    for destination in population {
        if !cache.contains_key(destination) && !missing.contains(&destination.as_str()) {
            missing.push(destination);
        }
    }

    let fresh: Vec<Individual> = if parallel {
        missing
            .par_iter()
            .map(|destination| Individual::evaluate(problem, destination))
            .collect::<Result<_, _>>()?
    } else {
        missing
            .iter()
            .map(|destination| Individual::evaluate(problem, destination))
            .collect::<Result<_, _>>()?
    };
    for individual in fresh {
        cache.insert(individual.destination.clone(), individual);
    }

    Ok(population
        .iter()
        .filter_map(|destination| cache.get(destination).cloned())
        .collect())
}
