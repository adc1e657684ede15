//! Tabular input model: scalar values, records, datasets and filters.
//!
//! Parsing and schema validation happen upstream; this module only models
//! already-validated rows and the relational operations the scenario search
//! performs on them (inner joins, distinct values, grouping, filtering).

mod dataset;
mod filter;
mod value;

pub use dataset::Dataset;
pub use filter::{Admissible, Filter};
pub use value::{record, Record, Value};
