//! Tabu search over destinations.
//!
//! Each round picks a destination at random (avoiding the ones picked in
//! the last `tabu_tenure` rounds), samples date neighbors of the original
//! trips for it, and keeps the cheapest solution seen per destination.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

mod config;
mod runner;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner};
