//! Truncation selection.

use super::types::Individual;

/// Parents of the next generation: the fitter half of the scored
/// population (at least two, never more than the population).
///
/// Ties keep population order.
///
/// # Examples
///
/// ```
/// use whatif_optim::ga::{select_parents, Individual};
///
/// let scored: Vec<Individual> = [("A", 3.0), ("B", 1.0), ("C", 2.0)]
///     .into_iter()
///     .map(|(d, cost)| Individual { destination: d.into(), cost, details: vec![] })
///     .collect();
/// assert_eq!(select_parents(&scored), vec!["B", "C"]);
/// ```
pub fn select_parents(scored: &[Individual]) -> Vec<String> {
    let mut ranked: Vec<&Individual> = scored.iter().collect();
    ranked.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    let count = (scored.len() / 2).max(2).min(scored.len());
    ranked
        .into_iter()
        .take(count)
        .map(|ind| ind.destination.clone())
        .collect()
}
