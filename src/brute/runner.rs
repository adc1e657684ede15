//! Exhaustive scenario search.
//!
//! # Algorithm
//!
//! 1. Validate parameters, policy columns and row uniqueness
//! 2. Keep the rows relevant to at least one policy record, then apply filters
//! 3. Enumerate the cross product of each parameter's distinct values
//! 4. Merge every scenario into every policy record and join the result
//!    against the data; an incomplete match scores `+inf`
//! 5. Score complete matches with the cost function and keep the best
//!    `top_n` in a [`BoundedTopN`]

use tracing::{debug, info, warn};

use super::config::BruteForceConfig;
use super::types::{CostFunction, Scenario, ScenarioResult};
use crate::error::{InputValidationError, OptimizationFailure, TableError};
use crate::table::{Dataset, Filter, Record, Value};
use crate::topn::BoundedTopN;

/// Column holding the scenario cost on fully matched rows.
pub const TOTAL_COST_COLUMN: &str = "total_cost";

#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 1024;

/// Brute-force scenario optimizer.
pub struct BruteForceRunner;

impl BruteForceRunner {
    /// Runs the exhaustive search and returns the lowest-cost scenarios,
    /// ascending by cost.
    ///
    /// # Errors
    ///
    /// Every failure (invalid inputs, table errors, cost function errors)
    /// surfaces as a single [`OptimizationFailure`].
    pub fn run<C: CostFunction>(
        dataset: &Dataset,
        policies: &[Record],
        filters: Option<&Filter>,
        cost_function: &C,
        config: &BruteForceConfig,
    ) -> Result<Vec<ScenarioResult>, OptimizationFailure> {
        Self::search(dataset, policies, filters, cost_function, config).inspect_err(|err| {
            warn!(error = %err, "scenario optimization failed");
        })
    }

    fn search<C: CostFunction>(
        dataset: &Dataset,
        policies: &[Record],
        filters: Option<&Filter>,
        cost_function: &C,
        config: &BruteForceConfig,
    ) -> Result<Vec<ScenarioResult>, OptimizationFailure> {
        config.validate()?;
        validate_inputs(dataset, &config.parameters, policies)?;

        let mut data = relevant_records(dataset, policies)?;
        if let Some(filter) = filters.filter(|f| !f.is_empty()) {
            data = filter.apply(&data)?;
        }

        let scenarios = enumerate_scenarios(&data, policies, &config.parameters)?;
        info!(
            scenarios = scenarios.len(),
            rows = data.len(),
            "evaluating brute-force scenarios"
        );

        let mut top = BoundedTopN::new(config.top_n)?;
        score_into(&data, &scenarios, cost_function, config.parallel, &mut top)?;
        let results = top.into_results();
        debug!(
            kept = results.len(),
            best = results.first().map(|(_, cost)| *cost),
            "brute-force search finished"
        );
        Ok(results)
    }
}

/// Runs the exhaustive search with default settings.
///
/// Equivalent to [`BruteForceRunner::run`] with
/// `BruteForceConfig::new(parameters).with_top_n(top_n)`.
pub fn optimize<C: CostFunction>(
    dataset: &Dataset,
    parameters: &[&str],
    policies: &[Record],
    filters: Option<&Filter>,
    cost_function: &C,
    top_n: usize,
) -> Result<Vec<ScenarioResult>, OptimizationFailure> {
    let config = BruteForceConfig::new(parameters.iter().copied()).with_top_n(top_n);
    BruteForceRunner::run(dataset, policies, filters, cost_function, &config)
}

fn validate_inputs(
    dataset: &Dataset,
    parameters: &[String],
    policies: &[Record],
) -> Result<(), InputValidationError> {
    let missing: Vec<String> = parameters
        .iter()
        .filter(|p| !dataset.has_column(p))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(InputValidationError::InvalidParameters { missing });
    }

    if policies.is_empty() {
        return Err(InputValidationError::EmptyPolicy);
    }
    let mut policy_columns: Vec<String> = Vec::new();
    for key in policies.iter().flat_map(|p| p.keys()) {
        if !policy_columns.contains(key) {
            policy_columns.push(key.clone());
        }
    }
    if !policy_columns.iter().any(|c| dataset.has_column(c)) {
        return Err(InputValidationError::NoCommonColumns { policy_columns });
    }

    if dataset.is_empty() {
        return Err(InputValidationError::EmptyDataset);
    }
    let mut columns: Vec<String> = Vec::new();
    for column in parameters.iter().chain(&policy_columns) {
        if dataset.has_column(column) && !columns.contains(column) {
            columns.push(column.clone());
        }
    }
    let group_size = dataset.max_group_size(&columns);
    if group_size != 1 {
        return Err(InputValidationError::DuplicateGroup {
            columns,
            group_size,
        });
    }
    Ok(())
}

/// Rows matching at least one policy record (per-record inner join, union,
/// duplicates dropped).
///
/// A row missing any joined key is dropped, so a record naming a column the
/// row leaves empty never keeps it.
pub fn relevant_records(dataset: &Dataset, policies: &[Record]) -> Result<Dataset, TableError> {
    let parts = policies
        .iter()
        .map(|policy| dataset.join(std::slice::from_ref(policy)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::concat_distinct(parts))
}

/// Cross product of each parameter's distinct values, one scenario per
/// combination. The first parameter varies slowest.
pub fn enumerate_parameter_space(
    dataset: &Dataset,
    parameters: &[String],
) -> Result<Vec<Scenario>, TableError> {
    let mut scenarios = vec![Scenario::new()];
    for parameter in parameters {
        let values = dataset.distinct_values(parameter)?;
        scenarios = scenarios
            .iter()
            .flat_map(|partial| {
                values.iter().map(move |value| {
                    let mut next = partial.clone();
                    next.insert(parameter.clone(), value.clone());
                    next
                })
            })
            .collect();
    }
    Ok(scenarios)
}

/// Overrides every policy record with the scenario's fields.
pub fn merge_into_policy(scenario: &Scenario, policies: &[Record]) -> Vec<Record> {
    policies
        .iter()
        .map(|policy| {
            let mut merged = policy.clone();
            merged.extend(scenario.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged
        })
        .collect()
}

/// Every scenario of the parameter space, merged into the policy.
pub fn enumerate_scenarios(
    dataset: &Dataset,
    policies: &[Record],
    parameters: &[String],
) -> Result<Vec<Vec<Record>>, TableError> {
    Ok(enumerate_parameter_space(dataset, parameters)?
        .iter()
        .map(|scenario| merge_into_policy(scenario, policies))
        .collect())
}

/// Scores one merged scenario against the data.
///
/// When every record matches exactly one row, returns the matched rows with
/// a [`TOTAL_COST_COLUMN`] and the cost function's total. Otherwise returns
/// the partial match with an infinite cost.
pub fn apply_cost_function<C: CostFunction + ?Sized>(
    dataset: &Dataset,
    scenario: &[Record],
    cost_function: &C,
) -> Result<ScenarioResult, TableError> {
    let matched = dataset.join(scenario)?;
    if matched.len() != scenario.len() {
        return Ok((matched, f64::INFINITY));
    }
    let cost = cost_function.evaluate(&matched)?;
    Ok((matched.with_column(TOTAL_COST_COLUMN, Value::Float(cost)), cost))
}

fn score_into<C: CostFunction>(
    data: &Dataset,
    scenarios: &[Vec<Record>],
    cost_function: &C,
    parallel: bool,
    top: &mut BoundedTopN<Dataset>,
) -> Result<(), TableError> {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;

        for chunk in scenarios.chunks(PARALLEL_CHUNK) {
            let scored = chunk
                .par_iter()
                .map(|scenario| apply_cost_function(data, scenario, cost_function))
                .collect::<Result<Vec<_>, _>>()?;
            for (matched, cost) in scored {
                top.add(matched, cost);
            }
        }
        return Ok(());
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for scenario in scenarios {
        let (matched, cost) = apply_cost_function(data, scenario, cost_function)?;
        top.add(matched, cost);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::record;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn day(d: u32) -> Value {
        Value::from(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    }

    fn group_policy() -> Vec<Record> {
        vec![
            record([("origin", Value::from("NYC")), ("travelers", Value::from(4))]),
            record([("origin", Value::from("Los Angeles")), ("travelers", Value::from(8))]),
            record([("origin", Value::from("Chicago")), ("travelers", Value::from(4))]),
        ]
    }

    fn travel_grid() -> Dataset {
        let prices = [
            ("NYC", "Seattle", 10, 1560.0),
            ("NYC", "Seattle", 12, 511.0),
            ("NYC", "Denver", 10, 900.0),
            ("NYC", "Denver", 12, 1000.0),
            ("Los Angeles", "Seattle", 10, 1448.0),
            ("Los Angeles", "Seattle", 12, 1500.0),
            ("Los Angeles", "Denver", 10, 700.0),
            ("Los Angeles", "Denver", 12, 650.0),
            ("Chicago", "Seattle", 10, 290.0),
            ("Chicago", "Seattle", 12, 300.0),
            ("Chicago", "Denver", 10, 400.0),
            ("Chicago", "Denver", 12, 350.0),
        ];
        Dataset::from_rows(prices.iter().map(|(origin, destination, from, price)| {
            record([
                ("origin", Value::from(*origin)),
                ("destination", Value::from(*destination)),
                ("date_from", day(*from)),
                ("date_to", day(16)),
                ("total_price", Value::from(*price)),
            ])
        }))
    }

    fn group_cost(rows: &Dataset) -> Result<f64, TableError> {
        rows.sum_product("total_price", "travelers")
    }

    fn parameters() -> Vec<&'static str> {
        vec!["destination", "date_from", "date_to"]
    }

    #[test]
    fn test_end_to_end_best_combination() {
        let results = optimize(
            &travel_grid(),
            &parameters(),
            &group_policy(),
            None,
            &group_cost,
            1,
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        let (rows, cost) = &results[0];
        assert_eq!(*cost, 1000.0 * 4.0 + 650.0 * 8.0 + 350.0 * 4.0);
        assert_eq!(rows.len(), 3);
        assert!(rows
            .rows()
            .iter()
            .all(|r| r["destination"] == Value::from("Denver") && r["date_from"] == day(12)));
        assert!(rows.rows().iter().all(|r| r[TOTAL_COST_COLUMN] == Value::Float(*cost)));
    }

    #[test]
    fn test_results_ascend_by_cost() {
        let results = optimize(
            &travel_grid(),
            &parameters(),
            &group_policy(),
            None,
            &group_cost,
            10,
        )
        .unwrap();
        let costs: Vec<f64> = results.iter().map(|(_, c)| *c).collect();
        assert_eq!(costs, vec![10600.0, 10800.0, 15244.0, 18984.0]);
    }

    #[test]
    fn test_unmatched_scenario_is_excluded() {
        let data = travel_grid().retain_rows(|r| {
            !(r["origin"] == Value::from("Chicago")
                && r["destination"] == Value::from("Denver")
                && r["date_from"] == day(12))
        });
        let results = optimize(&data, &parameters(), &group_policy(), None, &group_cost, 10).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1, 10800.0);
    }

    #[test]
    fn test_filter_restricts_domain() {
        let filter = Filter::new().with("destination", Value::from("Seattle"));
        let results = optimize(
            &travel_grid(),
            &parameters(),
            &group_policy(),
            Some(&filter),
            &group_cost,
            10,
        )
        .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].1, 15244.0);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let err = optimize(&travel_grid(), &["hotel"], &group_policy(), None, &group_cost, 3);
        assert!(matches!(
            err,
            Err(OptimizationFailure::Input(InputValidationError::InvalidParameters { missing }))
                if missing == vec!["hotel".to_owned()]
        ));
    }

    #[test]
    fn test_policy_without_common_column_rejected() {
        let policy = vec![record([("team", Value::from("ops"))])];
        let err = optimize(&travel_grid(), &parameters(), &policy, None, &group_cost, 3);
        assert!(matches!(
            err,
            Err(OptimizationFailure::Input(InputValidationError::NoCommonColumns { .. }))
        ));
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        let data = travel_grid();
        let mut rows = data.rows().to_vec();
        let mut dup = rows[0].clone();
        dup.insert("total_price".into(), Value::from(1.0));
        rows.push(dup);
        let err = optimize(
            &Dataset::from_rows(rows),
            &parameters(),
            &group_policy(),
            None,
            &group_cost,
            3,
        );
        assert!(matches!(
            err,
            Err(OptimizationFailure::Input(InputValidationError::DuplicateGroup { group_size: 2, .. }))
        ));
    }

    #[test]
    fn test_cost_function_error_wrapped() {
        let broken = |rows: &Dataset| rows.sum("no_such_column");
        let err = optimize(&travel_grid(), &parameters(), &group_policy(), None, &broken, 3);
        assert!(matches!(err, Err(OptimizationFailure::Table(TableError::UnknownColumn { .. }))));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let err = optimize(&travel_grid(), &parameters(), &group_policy(), None, &group_cost, 0);
        assert!(matches!(err, Err(OptimizationFailure::Capacity(_))));
    }

    #[test]
    fn test_relevant_records_keep_policy_rows_only() {
        let policies = vec![
            record([("origin", Value::from("NYC"))]),
            record([("origin", Value::from("Chicago"))]),
        ];
        let relevant = relevant_records(&travel_grid(), &policies).unwrap();
        assert_eq!(relevant.len(), 8);
        assert!(relevant
            .rows()
            .iter()
            .all(|r| r["origin"] != Value::from("Los Angeles")));

        let nowhere = vec![record([("origin", Value::from("Miami"))])];
        assert!(relevant_records(&travel_grid(), &nowhere).unwrap().is_empty());
    }

    #[test]
    fn test_merge_into_policy_overrides_and_preserves() {
        let scenario = record([("destination", Value::from("Seattle")), ("origin", Value::from("X"))]);
        let merged = merge_into_policy(&scenario, &group_policy());
        assert_eq!(merged.len(), 3);
        for (m, p) in merged.iter().zip(group_policy()) {
            assert_eq!(m["destination"], Value::from("Seattle"));
            assert_eq!(m["origin"], Value::from("X"));
            assert_eq!(m["travelers"], p["travelers"]);
        }
    }

    #[test]
    fn test_apply_cost_function_match_and_miss() {
        let data = Dataset::from_rows((1..=4).map(|d| {
            record([
                ("date", day(d)),
                ("price", Value::from(f64::from(d) * 100.0)),
                ("quantity", Value::from(d)),
            ])
        }));
        let cost = |rows: &Dataset| rows.sum_product("price", "quantity");

        let (rows, total) =
            apply_cost_function(&data, &[record([("date", day(2)), ("quantity", Value::from(2))])], &cost)
                .unwrap();
        assert_eq!(total, 400.0);
        assert_eq!(rows.len(), 1);
        assert!(rows.has_column(TOTAL_COST_COLUMN));

        let (rows, total) = apply_cost_function(
            &data,
            &[record([("date", day(31)), ("quantity", Value::from(10))])],
            &cost,
        )
        .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, f64::INFINITY);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_scoring_matches_sequential() {
        // 40 destinations x 30 days: more scenarios than one parallel chunk
        let origins = ["NYC", "Chicago"];
        let rows: Vec<Record> = origins.iter().enumerate().flat_map(|(o, origin)| {
            (0..40i64).flat_map(move |d| {
                (0..30i64).map(move |t| {
                    record([
                        ("origin", Value::from(*origin)),
                        ("destination", Value::from(format!("City{d}"))),
                        ("day", Value::from(t)),
                        ("total_price", Value::from(((d * 7 + t * 13 + o as i64 * 5) % 97) as f64)),
                    ])
                })
            })
        })
        .collect();
        let data = Dataset::from_rows(rows);
        let policy = vec![
            record([("origin", Value::from("NYC")), ("travelers", Value::from(1))]),
            record([("origin", Value::from("Chicago")), ("travelers", Value::from(2))]),
        ];
        let config = BruteForceConfig::new(["destination", "day"]).with_top_n(5);

        let sequential =
            BruteForceRunner::run(&data, &policy, None, &group_cost, &config).unwrap();
        let parallel = BruteForceRunner::run(
            &data,
            &policy,
            None,
            &group_cost,
            &config.clone().with_parallel(true),
        )
        .unwrap();

        assert_eq!(sequential.len(), 5);
        let costs = |results: &[ScenarioResult]| results.iter().map(|r| r.1).collect::<Vec<_>>();
        assert_eq!(costs(&sequential), costs(&parallel));
        for ((a, _), (b, _)) in sequential.iter().zip(&parallel) {
            assert_eq!(a.rows(), b.rows());
        }
    }

    #[test]
    fn test_enumerate_parameter_space_product() {
        let data = Dataset::from_rows([
            record([("o", Value::from("NYC")), ("d", Value::from("Seattle"))]),
            record([("o", Value::from("LA")), ("d", Value::from("Chicago"))]),
        ]);
        let scenarios = enumerate_parameter_space(&data, &["o".into(), "d".into()]).unwrap();
        assert_eq!(scenarios.len(), 4);
        assert_eq!(scenarios[0], record([("o", Value::from("NYC")), ("d", Value::from("Seattle"))]));
        assert_eq!(scenarios[3], record([("o", Value::from("LA")), ("d", Value::from("Chicago"))]));
    }

    proptest! {
        #[test]
        fn prop_scenario_count_is_product_of_domains(
            rows in prop::collection::vec((0u8..4, 0u8..3, 0u8..5), 1..30),
        ) {
            let data = Dataset::from_rows(rows.iter().map(|(a, b, c)| {
                record([
                    ("a", Value::from(i64::from(*a))),
                    ("b", Value::from(i64::from(*b))),
                    ("c", Value::from(i64::from(*c))),
                ])
            }));
            let parameters: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
            let expected: usize = parameters
                .iter()
                .map(|p| data.distinct_values(p).unwrap().len())
                .product();

            let scenarios = enumerate_parameter_space(&data, &parameters).unwrap();
            prop_assert_eq!(scenarios.len(), expected);
            let keys: Vec<String> = parameters.clone();
            for scenario in &scenarios {
                prop_assert_eq!(scenario.keys().cloned().collect::<Vec<_>>(), keys.clone());
            }
            let unique: HashSet<&Record> = scenarios.iter().collect();
            prop_assert_eq!(unique.len(), scenarios.len());
        }
    }
}
