//! Cost function contract for scenario scoring.

use crate::error::TableError;
use crate::table::{Dataset, Record};

/// One concrete assignment of the optimization parameters.
pub type Scenario = Record;

/// A scored scenario: the matched rows (with a `total_cost` column when
/// fully matched) and the scenario's total cost.
pub type ScenarioResult = (Dataset, f64);

/// Computes the total cost of a scenario from its matched rows.
///
/// Implemented for any `Fn(&Dataset) -> Result<f64, TableError>`, so
/// closures can be passed directly:
///
/// ```
/// use whatif_optim::brute::CostFunction;
/// use whatif_optim::table::{record, Dataset, Value};
///
/// let cost = |rows: &Dataset| rows.sum_product("total_price", "travelers");
/// let rows = Dataset::from_rows([record([
///     ("total_price", Value::from(10.0)),
///     ("travelers", Value::from(4)),
/// ])]);
/// assert_eq!(cost.evaluate(&rows).unwrap(), 40.0);
/// ```
pub trait CostFunction: Sync {
    /// Returns the scenario's total cost.
    fn evaluate(&self, matched: &Dataset) -> Result<f64, TableError>;
}

impl<F> CostFunction for F
where
    F: Fn(&Dataset) -> Result<f64, TableError> + Sync,
{
    fn evaluate(&self, matched: &Dataset) -> Result<f64, TableError> {
        self(matched)
    }
}
