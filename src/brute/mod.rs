//! Exhaustive what-if scenario search over tabular data.
//!
//! Every combination of the parameter columns' distinct values is merged
//! into a policy (a list of partial records), joined back against the data
//! and scored by a user cost function. The `top_n` cheapest fully matched
//! scenarios are returned.
//!
//! # Examples
//!
//! ```
//! use whatif_optim::brute::{optimize, TOTAL_COST_COLUMN};
//! use whatif_optim::table::{record, Dataset, Value};
//!
//! let data = Dataset::from_rows([
//!     record([("origin", Value::from("NYC")), ("destination", Value::from("Denver")), ("price", Value::from(300.0))]),
//!     record([("origin", Value::from("NYC")), ("destination", Value::from("Austin")), ("price", Value::from(250.0))]),
//! ]);
//! let policy = vec![record([("origin", Value::from("NYC")), ("travelers", Value::from(2))])];
//! let cost = |rows: &Dataset| rows.sum_product("price", "travelers");
//!
//! let best = optimize(&data, &["destination"], &policy, None, &cost, 1).unwrap();
//! assert_eq!(best[0].1, 500.0);
//! assert!(best[0].0.has_column(TOTAL_COST_COLUMN));
//! ```

mod config;
mod runner;
mod types;

pub use config::BruteForceConfig;
pub use runner::{
    apply_cost_function, enumerate_parameter_space, enumerate_scenarios, merge_into_policy,
    optimize, relevant_records, BruteForceRunner, TOTAL_COST_COLUMN,
};
pub use types::{CostFunction, Scenario, ScenarioResult};
