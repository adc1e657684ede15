//! Genetic algorithm over destinations.
//!
//! Individuals are destinations. An individual's fitness is the negated
//! cost of its cheapest date variant (every departure/return combination
//! of the shared event window). Each generation keeps the fitter half as
//! parents and breeds a new population by single-parent crossover and
//! random-reset mutation.
//!
//! # Key Types
//!
//! - [`GaConfig`]: population size, generation count, mutation rate
//! - [`GaRunner`]: executes the evolutionary loop
//! - [`GaResult`]: ranked recommendations and per-generation statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use selection::select_parents;
pub use types::Individual;
