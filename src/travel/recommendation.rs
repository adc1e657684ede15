//! Ranked, algorithm-attributed search results.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cost::CostRecord;
use crate::error::UnknownAlgorithm;

/// Recommendations returned per algorithm run.
pub const TOP_RECOMMENDATIONS: usize = 3;

/// The available search procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// [`TabuRunner`](crate::tabu::TabuRunner).
    #[cfg_attr(feature = "serde", serde(rename = "Tabu Search"))]
    TabuSearch,
    /// [`SaRunner`](crate::sa::SaRunner).
    #[cfg_attr(feature = "serde", serde(rename = "Annealing Algorithm", alias = "Annealing"))]
    Annealing,
    /// [`GaRunner`](crate::ga::GaRunner).
    #[cfg_attr(feature = "serde", serde(rename = "Genetic Algorithm"))]
    GeneticAlgorithm,
}

impl Algorithm {
    /// Every algorithm, in submission order.
    pub const ALL: [Self; 3] = [Self::TabuSearch, Self::Annealing, Self::GeneticAlgorithm];

    /// Name reported in recommendations.
    pub fn name(self) -> &'static str {
        match self {
            Self::TabuSearch => "Tabu Search",
            Self::Annealing => "Annealing Algorithm",
            Self::GeneticAlgorithm => "Genetic Algorithm",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Accepts the reported names and the short request name `Annealing`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tabu Search" => Ok(Self::TabuSearch),
            "Annealing" | "Annealing Algorithm" => Ok(Self::Annealing),
            "Genetic Algorithm" => Ok(Self::GeneticAlgorithm),
            other => Err(UnknownAlgorithm(other.to_owned())),
        }
    }
}

/// One ranked destination proposed by an algorithm run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recommendation {
    /// Producing algorithm.
    #[cfg_attr(feature = "serde", serde(rename = "Algorithm"))]
    pub algorithm: Algorithm,
    /// 1-based rank within the run.
    #[cfg_attr(feature = "serde", serde(rename = "Recommendations"))]
    pub rank: usize,
    /// Recommended destination.
    #[cfg_attr(feature = "serde", serde(rename = "Optimal_Destination"))]
    pub destination: String,
    /// Combined cost of every trip.
    #[cfg_attr(feature = "serde", serde(rename = "Overall Cost"))]
    pub overall_cost: f64,
    /// Per-trip cost records.
    #[cfg_attr(feature = "serde", serde(rename = "Details"))]
    pub details: Vec<CostRecord>,
}

/// Lowest cost seen per destination, in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct DestinationBoard {
    entries: Vec<(String, f64, Vec<CostRecord>)>,
}

impl DestinationBoard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a solution; returns `true` when it improves its destination.
    /// Non-finite costs are ignored.
    pub(crate) fn offer(&mut self, destination: &str, cost: f64, details: Vec<CostRecord>) -> bool {
        if !cost.is_finite() {
            return false;
        }
        match self.entries.iter_mut().find(|(d, _, _)| d == destination) {
            Some(entry) if cost < entry.1 => {
                entry.1 = cost;
                entry.2 = details;
                true
            }
            Some(_) => false,
            None => {
                self.entries.push((destination.to_owned(), cost, details));
                true
            }
        }
    }

    pub(crate) fn contains(&self, destination: &str) -> bool {
        self.entries.iter().any(|(d, _, _)| d == destination)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Top destinations by cost (ties keep first-seen order), ranked from 1.
    pub(crate) fn into_recommendations(mut self, algorithm: Algorithm) -> Vec<Recommendation> {
        self.entries.sort_by(|a, b| a.1.total_cmp(&b.1));
        self.entries
            .into_iter()
            .take(TOP_RECOMMENDATIONS)
            .enumerate()
            .map(|(i, (destination, overall_cost, details))| Recommendation {
                algorithm,
                rank: i + 1,
                destination,
                overall_cost,
                details,
            })
            .collect()
    }
}

/// Keeps the first recommendation of each rank.
pub fn dedup_by_rank(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut seen = Vec::new();
    recommendations
        .into_iter()
        .filter(|r| {
            if seen.contains(&r.rank) {
                false
            } else {
                seen.push(r.rank);
                true
            }
        })
        .collect()
}

/// One trip's cost record, tagged with its recommendation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetailRow {
    /// Producing algorithm.
    #[cfg_attr(feature = "serde", serde(rename = "Algorithm"))]
    pub algorithm: Algorithm,
    /// Rank of the recommendation.
    #[cfg_attr(feature = "serde", serde(rename = "Recommendations"))]
    pub rank: usize,
    /// Recommended destination.
    #[cfg_attr(feature = "serde", serde(rename = "Optimal_Destination"))]
    pub destination: String,
    /// Combined cost of the recommendation.
    #[cfg_attr(feature = "serde", serde(rename = "Overall Cost"))]
    pub overall_cost: f64,
    /// The trip's record.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: CostRecord,
}

/// Flattens recommendations into one row per trip, for tabular reports.
pub fn detailed_rows(recommendations: &[Recommendation]) -> Vec<DetailRow> {
    recommendations
        .iter()
        .flat_map(|r| {
            r.details.iter().map(move |record| DetailRow {
                algorithm: r.algorithm,
                rank: r.rank,
                destination: r.destination.clone(),
                overall_cost: r.overall_cost,
                record: record.clone(),
            })
        })
        .collect()
}

/// Final JSON response: one recommendation per rank.
#[cfg(feature = "serde")]
pub fn recommendations_to_json(recommendations: &[Recommendation]) -> serde_json::Result<String> {
    serde_json::to_string(&dedup_by_rank(recommendations.to_vec()))
}
