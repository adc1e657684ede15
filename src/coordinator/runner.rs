//! Task fan-out and rank reconciliation.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use super::config::OptimizationConfig;
use crate::error::{AlgorithmError, ConcurrentOptimizationError};
use crate::ga::GaRunner;
use crate::sa::SaRunner;
use crate::stop::StopSignal;
use crate::tabu::TabuRunner;
use crate::travel::{Algorithm, Recommendation, TravelProblem};

/// One submitted algorithm run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Task {
    algorithm: Algorithm,
    repetition: usize,
    seed: Option<u64>,
}

/// Runs the selected algorithms concurrently and merges their rankings.
pub struct ConcurrentCoordinator;

impl ConcurrentCoordinator {
    /// Runs every (algorithm, repetition) task and reconciles the results.
    pub fn run(
        problem: &TravelProblem,
        config: &OptimizationConfig,
    ) -> Result<Vec<Recommendation>, ConcurrentOptimizationError> {
        Self::run_with_stop(problem, config, &StopSignal::new())
    }

    /// Like [`run`](Self::run), stopping every task once `stop` fires or the
    /// configured timeout elapses.
    ///
    /// # Errors
    ///
    /// The first failed task in submission order decides the error: a
    /// stopped task yields [`ConcurrentOptimizationError::Cancelled`], any
    /// other failure [`ConcurrentOptimizationError::Task`].
    pub fn run_with_stop(
        problem: &TravelProblem,
        config: &OptimizationConfig,
        stop: &StopSignal,
    ) -> Result<Vec<Recommendation>, ConcurrentOptimizationError> {
        config.validate()?;
        let stop = match config.coordinator.timeout {
            Some(timeout) => stop.clone().with_timeout(timeout),
            None => stop.clone(),
        };
        let tasks = plan_tasks(config);
        info!(
            tasks = tasks.len(),
            workers = config.coordinator.max_workers,
            "starting concurrent optimization"
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.coordinator.max_workers)
            .build()?;
        let outcomes: Vec<Result<Vec<Recommendation>, AlgorithmError>> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| run_task(problem.clone(), config, task, &stop))
                .collect()
        });

        let mut collected = Vec::new();
        for (task, outcome) in tasks.iter().zip(outcomes) {
            match outcome {
                Ok(recommendations) => collected.extend(recommendations),
                Err(err) if err.is_cancelled() => {
                    warn!(algorithm = %task.algorithm, "concurrent optimization cancelled");
                    return Err(ConcurrentOptimizationError::Cancelled);
                }
                Err(err) => {
                    warn!(algorithm = %task.algorithm, repetition = task.repetition, error = %err, "optimization task failed");
                    return Err(ConcurrentOptimizationError::Task(err));
                }
            }
        }

        let merged = reconcile(collected);
        info!(recommendations = merged.len(), "concurrent optimization finished");
        Ok(merged)
    }
}

/// Tasks in submission order, each with its derived seed.
fn plan_tasks(config: &OptimizationConfig) -> Vec<Task> {
    let coordinator = &config.coordinator;
    coordinator
        .algorithms
        .iter()
        .flat_map(|&algorithm| (0..coordinator.repetitions).map(move |repetition| (algorithm, repetition)))
        .enumerate()
        .map(|(index, (algorithm, repetition))| {
            let own_seed = match algorithm {
                Algorithm::TabuSearch => config.tabu.seed,
                Algorithm::Annealing => config.annealing.seed,
                Algorithm::GeneticAlgorithm => config.genetic.seed,
            };
            Task {
                algorithm,
                repetition,
                seed: coordinator.seed.or(own_seed).map(|s| s.wrapping_add(index as u64)),
            }
        })
        .collect()
}

/// Runs one task on its own copy of the problem.
fn run_task(
    problem: TravelProblem,
    config: &OptimizationConfig,
    task: &Task,
    stop: &StopSignal,
) -> Result<Vec<Recommendation>, AlgorithmError> {
    debug!(algorithm = %task.algorithm, repetition = task.repetition, seed = ?task.seed, "task started");
    let recommendations = match task.algorithm {
        Algorithm::TabuSearch => {
            let mut tabu = config.tabu.clone();
            tabu.seed = task.seed;
            TabuRunner::run_with_stop(&problem, &tabu, stop)?.recommendations
        }
        Algorithm::Annealing => {
            let mut annealing = config.annealing.clone();
            annealing.seed = task.seed;
            SaRunner::run_with_stop(&problem, &annealing, stop)?.recommendations
        }
        Algorithm::GeneticAlgorithm => {
            let mut genetic = config.genetic.clone();
            genetic.seed = task.seed;
            GaRunner::run_with_stop(&problem, &genetic, stop)?.recommendations
        }
    };
    Ok(recommendations)
}

/// Keeps, for each rank, every record at that rank's lowest cost, then
/// sorts by rank.
///
/// The sort is stable, so records sharing a rank keep their input order.
///
/// ```
/// use whatif_optim::coordinator::reconcile;
/// use whatif_optim::travel::{Algorithm, Recommendation};
///
/// let rec = |algorithm, rank, destination: &str, overall_cost| Recommendation {
///     algorithm,
///     rank,
///     destination: destination.into(),
///     overall_cost,
///     details: Vec::new(),
/// };
/// let merged = reconcile(vec![
///     rec(Algorithm::TabuSearch, 2, "Seattle", 900.0),
///     rec(Algorithm::TabuSearch, 1, "NYC", 700.0),
///     rec(Algorithm::Annealing, 1, "Boston", 650.0),
/// ]);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0].destination, "Boston");
/// assert_eq!(merged[1].rank, 2);
/// ```
pub fn reconcile(records: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut best: BTreeMap<usize, f64> = BTreeMap::new();
    for record in &records {
        best.entry(record.rank)
            .and_modify(|cost| *cost = cost.min(record.overall_cost))
            .or_insert(record.overall_cost);
    }
    let mut kept: Vec<Recommendation> = records
        .into_iter()
        .filter(|record| best.get(&record.rank).is_some_and(|&cost| record.overall_cost == cost))
        .collect();
    kept.sort_by_key(|record| record.rank);
    kept
}
