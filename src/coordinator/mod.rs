//! Concurrent multi-algorithm coordination.
//!
//! Runs every selected algorithm, `repetitions` times each, on a bounded
//! rayon pool and reconciles their recommendations into one ranking.
//!
//! # Submodules
//!
//! - [`config`]: Coordinator and per-algorithm configuration
//! - [`runner`]: Task fan-out and rank reconciliation
//! - [`request`]: Request-level facade building the problem from trips
//!
//! # Tie-break
//!
//! Tasks are collected in submission order (algorithm order, then
//! repetition), so when several records share the lowest cost for a rank
//! they are returned in that order regardless of which task finished first.

mod config;
mod request;
mod runner;

pub use config::{CoordinatorConfig, OptimizationConfig};
pub use request::{OptimizationRequest, TravelOptimization};
pub use runner::{reconcile, ConcurrentCoordinator};
