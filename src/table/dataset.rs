//! Row-oriented dataset with the relational helpers the scenario search needs.

use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::value::{Record, Value};
use crate::error::TableError;

/// An ordered table of records.
///
/// Columns keep first-seen order. A row without a key for some column holds
/// a missing cell there; missing cells never match in joins or filters.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset with declared columns; keys found only in rows are
    /// appended to the column list.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        let mut dataset = Self {
            columns,
            rows: Vec::new(),
        };
        for row in rows {
            dataset.push(row);
        }
        dataset
    }

    /// Creates a dataset whose columns are the union of the row keys.
    pub fn from_rows(rows: impl IntoIterator<Item = Record>) -> Self {
        Self::new(Vec::new(), rows.into_iter().collect())
    }

    /// Appends a row, registering any new column.
    pub fn push(&mut self, row: Record) {
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `column` is a known column.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    fn require_column(&self, column: &str) -> Result<(), TableError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(TableError::UnknownColumn {
                column: column.to_owned(),
            })
        }
    }

    /// Distinct non-missing values of a column, in first-seen order.
    pub fn distinct_values(&self, column: &str) -> Result<Vec<Value>, TableError> {
        self.require_column(column)?;
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|value| seen.insert(*value))
            .cloned()
            .collect())
    }

    /// Keeps the rows matching `predicate`.
    pub fn retain_rows(&self, mut predicate: impl FnMut(&Record) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| predicate(row)).cloned().collect(),
        }
    }

    /// Inner join against a list of records.
    ///
    /// Joins on every column shared between the dataset and the record keys.
    /// Each output row is a dataset row extended with the record's remaining
    /// fields; output keeps dataset row order.
    ///
    /// # Errors
    ///
    /// Fails with [`TableError::NoJoinColumns`] when nothing is shared.
    pub fn join(&self, records: &[Record]) -> Result<Self, TableError> {
        let mut record_columns: Vec<&String> = Vec::new();
        for key in records.iter().flat_map(|r| r.keys()) {
            if !record_columns.contains(&key) {
                record_columns.push(key);
            }
        }
        let on: Vec<&String> = self
            .columns
            .iter()
            .filter(|c| record_columns.contains(c))
            .collect();
        if on.is_empty() {
            return Err(TableError::NoJoinColumns);
        }

        let mut columns = self.columns.clone();
        for key in record_columns {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }

        let mut rows = Vec::new();
        for row in &self.rows {
            for rec in records {
                let matches = on.iter().all(|c| match (row.get(*c), rec.get(*c)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                });
                if matches {
                    let mut merged = row.clone();
                    for (k, v) in rec {
                        merged.entry(k.clone()).or_insert_with(|| v.clone());
                    }
                    rows.push(merged);
                }
            }
        }
        Ok(Self { columns, rows })
    }

    /// Concatenates datasets, dropping duplicate rows (first occurrence wins).
    pub fn concat_distinct(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut out = Self::default();
        let mut seen: HashSet<Record> = HashSet::new();
        for part in parts {
            for column in part.columns {
                if !out.columns.contains(&column) {
                    out.columns.push(column);
                }
            }
            for row in part.rows {
                if seen.insert(row.clone()) {
                    out.rows.push(row);
                }
            }
        }
        out
    }

    /// Size of the largest group of rows sharing the same values in
    /// `columns`. Rows with a missing key cell are not grouped.
    pub fn max_group_size(&self, columns: &[String]) -> usize {
        let mut groups: HashMap<Vec<&Value>, usize> = HashMap::new();
        for row in &self.rows {
            let key: Option<Vec<&Value>> = columns.iter().map(|c| row.get(c)).collect();
            if let Some(key) = key {
                *groups.entry(key).or_insert(0) += 1;
            }
        }
        groups.into_values().max().unwrap_or(0)
    }

    /// Numeric values of a column, one per row.
    ///
    /// # Errors
    ///
    /// Fails if the column is unknown, or a cell is missing or non-numeric.
    pub fn column_f64(&self, column: &str) -> Result<Vec<f64>, TableError> {
        self.require_column(column)?;
        self.rows
            .iter()
            .map(|row| {
                row.get(column)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| TableError::NotNumeric {
                        column: column.to_owned(),
                        value: row
                            .get(column)
                            .map_or_else(|| "<missing>".to_owned(), ToString::to_string),
                    })
            })
            .collect()
    }

    /// Sum of a numeric column.
    pub fn sum(&self, column: &str) -> Result<f64, TableError> {
        Ok(self.column_f64(column)?.iter().sum())
    }

    /// Row-wise product of two numeric columns, summed.
    ///
    /// ```
    /// use whatif_optim::table::{record, Dataset, Value};
    ///
    /// let data = Dataset::from_rows([
    ///     record([("price", Value::from(10.0)), ("qty", Value::from(2))]),
    ///     record([("price", Value::from(5.0)), ("qty", Value::from(3))]),
    /// ]);
    /// assert_eq!(data.sum_product("price", "qty").unwrap(), 35.0);
    /// ```
    pub fn sum_product(&self, left: &str, right: &str) -> Result<f64, TableError> {
        let a = self.column_f64(left)?;
        let b = self.column_f64(right)?;
        Ok(a.iter().zip(&b).map(|(x, y)| x * y).sum())
    }

    /// Sets `column` to `value` on every row.
    pub fn with_column(mut self, column: &str, value: Value) -> Self {
        if !self.has_column(column) {
            self.columns.push(column.to_owned());
        }
        for row in &mut self.rows {
            row.insert(column.to_owned(), value.clone());
        }
        self
    }
}
