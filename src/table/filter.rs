//! Pre-search filters narrowing the enumerable parameter domain.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::dataset::Dataset;
use super::value::Value;
use crate::error::TableError;

/// Admissible values for one column: a single value or a list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum Admissible {
    /// Exactly this value.
    One(Value),
    /// Any of these values.
    Many(Vec<Value>),
}

impl Admissible {
    /// Whether `value` is admitted.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Self::One(v) => v == value,
            Self::Many(values) => values.contains(value),
        }
    }
}

impl From<Value> for Admissible {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Value>> for Admissible {
    fn from(values: Vec<Value>) -> Self {
        Self::Many(values)
    }
}

/// Column name to admissible values; rows must satisfy every entry.
///
/// ```
/// use whatif_optim::table::{Filter, Value};
///
/// let filter = Filter::new()
///     .with("stars", Value::from(4))
///     .with("origin", vec![Value::from("NYC"), Value::from("Chicago")]);
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Filter {
    columns: BTreeMap<String, Admissible>,
}

impl Filter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the admissible values of a column.
    pub fn with(mut self, column: impl Into<String>, admissible: impl Into<Admissible>) -> Self {
        self.columns.insert(column.into(), admissible.into());
        self
    }

    /// Number of filtered columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Filtered columns and their admissible values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Admissible)> {
        self.columns.iter()
    }

    /// Keeps the rows admitted by every filtered column.
    ///
    /// # Errors
    ///
    /// Fails with [`TableError::UnknownColumn`] when a filtered column is
    /// not in the dataset.
    pub fn apply(&self, dataset: &Dataset) -> Result<Dataset, TableError> {
        if let Some(column) = self.columns.keys().find(|c| !dataset.has_column(c)) {
            return Err(TableError::UnknownColumn {
                column: column.clone(),
            });
        }
        Ok(dataset.retain_rows(|row| {
            self.columns
                .iter()
                .all(|(column, admissible)| row.get(column).is_some_and(|v| admissible.admits(v)))
        }))
    }
}
