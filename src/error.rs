//! Error taxonomy.
//!
//! Low-level failures (price lookups, table operations) are wrapped with
//! context at each layer, so every public entry point exposes exactly one
//! error type:
//!
//! - [`OptimizationFailure`] for the brute-force scenario search,
//! - [`AlgorithmError`] for a single metaheuristic run,
//! - [`ConcurrentOptimizationError`] for coordinated runs.
//!
//! A scenario whose policy entries cannot all be matched is not an error:
//! it is scored with an infinite cost.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-N container constructed with a zero capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("top-N capacity must be a positive integer, got {0}")]
pub struct InvalidCapacity(pub usize);

/// Rejected inputs, detected before any search starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    /// Some optimization parameters are not dataset columns.
    #[error("parameters {missing:?} are not dataset columns")]
    InvalidParameters {
        /// Parameter names absent from the dataset.
        missing: Vec<String>,
    },
    /// None of the policy keys is a dataset column.
    #[error("no common columns between policy keys {policy_columns:?} and the dataset")]
    NoCommonColumns {
        /// Union of the policy record keys.
        policy_columns: Vec<String>,
    },
    /// Rows are not unique under the parameter and policy columns.
    #[error("rows are not unique under {columns:?}: a group holds {group_size} rows")]
    DuplicateGroup {
        /// Grouping columns.
        columns: Vec<String>,
        /// Size of the largest group.
        group_size: usize,
    },
    /// The dataset has no rows to group.
    #[error("dataset has no rows")]
    EmptyDataset,
    /// No policy records were given.
    #[error("at least one policy record is required")]
    EmptyPolicy,
    /// No trips were given.
    #[error("at least one trip is required")]
    NoTrips,
    /// A trip ends before it starts.
    #[error("trip from {origin} ends on {end_date}, before its start on {start_date}")]
    InvalidTripDates {
        /// Trip origin.
        origin: String,
        /// Declared start date.
        start_date: NaiveDate,
        /// Declared end date.
        end_date: NaiveDate,
    },
    /// A trip has no travelers.
    #[error("trip from {origin} has no travelers")]
    NoTravelers {
        /// Trip origin.
        origin: String,
    },
}

/// Failures of tabular operations and cost functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The column does not exist.
    #[error("unknown column `{column}`")]
    UnknownColumn {
        /// Requested column.
        column: String,
    },
    /// A cell that should be numeric is not.
    #[error("column `{column}` holds a non-numeric value `{value}`")]
    NotNumeric {
        /// Column of the offending cell.
        column: String,
        /// Rendered cell value.
        value: String,
    },
    /// A cell holds a value of the wrong kind.
    #[error("column `{column}` holds `{value}`, expected {expected}")]
    UnexpectedType {
        /// Column of the offending cell.
        column: String,
        /// Expected kind of value.
        expected: &'static str,
        /// Rendered cell value.
        value: String,
    },
    /// A join was requested with no shared column.
    #[error("no common columns to join on")]
    NoJoinColumns,
}

/// Single error surface of the brute-force scenario search.
#[derive(Debug, Error)]
pub enum OptimizationFailure {
    /// Inputs were rejected before enumeration.
    #[error("an unexpected error occurred during optimization: invalid input")]
    Input(#[from] InputValidationError),
    /// A table operation or the cost function failed.
    #[error("an unexpected error occurred during optimization: table operation failed")]
    Table(#[from] TableError),
    /// The requested result count was zero.
    #[error("an unexpected error occurred during optimization: invalid result count")]
    Capacity(#[from] InvalidCapacity),
}

/// Date sequence construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateRangeError {
    /// Symmetric ranges need a positive flex.
    #[error("the flex parameter must be a positive integer, got {0}")]
    NonPositiveFlex(i64),
    /// The range leaves the representable calendar.
    #[error("date range around {0} is out of the supported calendar")]
    OutOfRange(NaiveDate),
}

/// Malformed or unusable price data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceDataError {
    /// A matching record carries a negative or non-finite price.
    #[error("{field} of {value} on {date} is not a valid price")]
    MalformedPrice {
        /// Price field name.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// Date of the record.
        date: NaiveDate,
    },
    /// The trip still lists several destination choices.
    #[error("destination is not resolved to a single city")]
    UnresolvedDestination,
    /// The stay ends before it starts.
    #[error("stay ends on {end}, before it starts on {start}")]
    InvertedStay {
        /// Check-in date.
        start: NaiveDate,
        /// Check-out date.
        end: NaiveDate,
    },
}

/// A cost term failed for a trip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// Flight estimate failed.
    #[error("flight estimation failed for {origin} -> {destination} on {date}")]
    Flight {
        /// Trip origin.
        origin: String,
        /// Trip destination.
        destination: String,
        /// Travel date.
        date: NaiveDate,
        /// Underlying cause.
        #[source]
        source: PriceDataError,
    },
    /// Hotel estimate failed.
    #[error("hotel estimation failed for {origin} -> {destination} on {date}")]
    Hotel {
        /// Trip origin.
        origin: String,
        /// Trip destination.
        destination: String,
        /// Check-in date.
        date: NaiveDate,
        /// Underlying cause.
        #[source]
        source: PriceDataError,
    },
    /// A caller-supplied cost term failed.
    #[error("cost term `{term}` failed for {origin} -> {destination} on {date}: {message}")]
    Term {
        /// Term name.
        term: String,
        /// Trip origin.
        origin: String,
        /// Trip destination.
        destination: String,
        /// Trip start date.
        date: NaiveDate,
        /// Failure description.
        message: String,
    },
}

/// Aggregating the cost terms of a trip failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("error occurred while calculating trip cost")]
pub struct TripCalculationError {
    /// The failing term.
    #[from]
    pub source: EstimationError,
}

/// An invalid optimizer configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration: {field} {reason}")]
pub struct ConfigError {
    /// Offending field.
    pub field: &'static str,
    /// Why the value is rejected.
    pub reason: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure inside one search procedure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// A candidate solution could not be costed.
    #[error("candidate evaluation failed")]
    Trip(#[from] TripCalculationError),
    /// No destination is left to explore.
    #[error("no candidate destinations to explore")]
    NoDestinations,
    /// The configuration is invalid.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    /// The stop signal fired.
    #[error("search cancelled")]
    Cancelled,
}

/// Failure of one metaheuristic run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlgorithmError {
    /// Tabu search failed.
    #[error("error occurred during tabu search optimization")]
    Tabu(#[source] SearchError),
    /// Simulated annealing failed.
    #[error("error occurred during annealing optimization")]
    Annealing(#[source] SearchError),
    /// The genetic algorithm failed.
    #[error("error occurred during genetic algorithm optimization")]
    Genetic(#[source] SearchError),
}

impl AlgorithmError {
    /// The underlying search failure.
    pub fn search_error(&self) -> &SearchError {
        match self {
            Self::Tabu(err) | Self::Annealing(err) | Self::Genetic(err) => err,
        }
    }

    /// Whether the run stopped because of a stop signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.search_error(), SearchError::Cancelled)
    }
}

/// An algorithm name that matches no optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown optimization algorithm `{0}`")]
pub struct UnknownAlgorithm(pub String);

/// Failure of a coordinated multi-algorithm run.
#[derive(Debug, Error)]
pub enum ConcurrentOptimizationError {
    /// A task failed.
    #[error("an unexpected error occurred during running optimization in concurrent")]
    Task(#[from] AlgorithmError),
    /// The worker pool could not be created.
    #[error("failed to build the optimization worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    /// The run was cancelled or timed out.
    #[error("concurrent optimization cancelled before completion")]
    Cancelled,
    /// The request was rejected.
    #[error("invalid optimization request")]
    InvalidRequest(#[from] InputValidationError),
    /// The configuration was rejected.
    #[error("invalid coordinator configuration")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 3).unwrap_or_default()
    }

    #[test]
    fn test_estimation_error_names_trip() {
        let err = EstimationError::Flight {
            origin: "Chicago".into(),
            destination: "Seattle".into(),
            date: date(),
            source: PriceDataError::UnresolvedDestination,
        };
        let text = err.to_string();
        assert!(text.contains("Chicago"));
        assert!(text.contains("Seattle"));
        assert!(text.contains("2024-04-03"));
    }

    #[test]
    fn test_cause_chain_is_preserved() {
        let estimation = EstimationError::Hotel {
            origin: "A".into(),
            destination: "B".into(),
            date: date(),
            source: PriceDataError::UnresolvedDestination,
        };
        let err = AlgorithmError::Tabu(SearchError::Trip(TripCalculationError::from(estimation)));
        let trip = err.source().and_then(|e| e.source());
        assert!(trip.is_some_and(|e| e.to_string().contains("calculating trip cost")));
        let estimation = trip.and_then(|e| e.source());
        assert!(estimation.is_some_and(|e| e.to_string().contains("hotel estimation")));
    }

    #[test]
    fn test_cancelled_detection() {
        assert!(AlgorithmError::Genetic(SearchError::Cancelled).is_cancelled());
        assert!(!AlgorithmError::Genetic(SearchError::NoDestinations).is_cancelled());
    }
}
