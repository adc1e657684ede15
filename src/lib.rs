//! Scenario optimization engine for what-if analysis.
//!
//! Two families of search share this crate:
//!
//! - **Brute force** ([`brute`]): enumerates every combination of the
//!   distinct values of chosen parameter columns, joins each scenario back
//!   against the data and keeps the cheapest few in a [`topn::BoundedTopN`].
//! - **Travel metaheuristics**: place a group of trips at one destination
//!   and move their dates within a flex window, scored by a composable
//!   flight/hotel [`travel::CostModel`] over a price history.
//!   - **Tabu Search** ([`tabu`]): random destination rounds with optional
//!     short-term memory, best solution kept per destination.
//!   - **Simulated Annealing** ([`sa`]): Metropolis walk over neighbor
//!     solutions with geometric cooling.
//!   - **Genetic Algorithm** ([`ga`]): population of destinations, each
//!     scored by its best date variant.
//!   - **Coordinator** ([`coordinator`]): runs the selected algorithms
//!     concurrently on a bounded pool and reconciles their rankings.
//!
//! # Architecture
//!
//! Input parsing, persistence and presentation stay with the caller: the
//! crate consumes already-validated [`table::Dataset`]s and
//! [`travel::PriceHistory`] records and returns typed results. Every
//! stochastic search accepts an optional seed and a [`stop::StopSignal`].
//! Logging goes through `tracing`; no subscriber is installed here.

pub mod brute;
pub mod coordinator;
pub mod dates;
pub mod error;
pub mod ga;
pub mod random;
pub mod sa;
pub mod stop;
pub mod table;
pub mod tabu;
pub mod topn;
pub mod travel;
