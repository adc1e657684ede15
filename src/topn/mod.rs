//! Memory-bounded retention of the lowest-cost results.
//!
//! [`BoundedTopN`] accepts an unbounded stream of `(result, cost)` pairs and
//! keeps the `n` cheapest. Sorting is amortized: pairs accumulate unsorted
//! and the container is only sorted and truncated when it grows past
//! `n × FLUSH_FACTOR` entries, or when results are requested.

mod bounded;

pub use bounded::{BoundedTopN, FLUSH_FACTOR};
