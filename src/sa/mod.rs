//! Simulated annealing over destinations.
//!
//! A single trajectory starts at a destination every trip admits and moves
//! to date/destination neighbors of the current trips. Worsening moves are
//! accepted with a probability that shrinks as the temperature cools.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
