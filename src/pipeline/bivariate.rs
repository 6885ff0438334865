//! Pairwise relationships: group means, cross-tabs, correlation, tests

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::config::EdaConfig;
use super::correlation::{correlation_matrix, pearson_test, CorrelationMatrix, PearsonTest};
use super::crosstab::{crosstab, CrossTab, KeyOrder};
use super::error::{EdaError, Result, Step};
use super::frame::{float_values, string_values};
use super::hypothesis::{chi_square_independence, ttest_independent, ChiSquareResult, TTestResult};
use super::stats::mean;
use super::univariate::{box_stats, BoxPlotStats};

/// Means of value columns per key group
#[derive(Debug, Clone, Serialize)]
pub struct GroupMeans {
    pub key: String,
    pub value_columns: Vec<String>,
    /// (group label, mean per value column), groups sorted by label
    pub rows: Vec<(String, Vec<Option<f64>>)>,
}

/// Partition row indices by the non-null labels of `key`.
fn partition(df: &DataFrame, step: Step, key: &str) -> Result<BTreeMap<String, Vec<usize>>> {
    let keys = string_values(df, step, key)?;
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, k) in keys.into_iter().enumerate() {
        if let Some(k) = k {
            groups.entry(k).or_default().push(row);
        }
    }
    Ok(groups)
}

/// Non-null, non-NaN values of `values` at `rows`.
fn gather(values: &[Option<f64>], rows: &[usize]) -> Vec<f64> {
    rows.iter()
        .filter_map(|&r| values[r])
        .filter(|v| !v.is_nan())
        .collect()
}

pub fn group_means(df: &DataFrame, key: &str, value_columns: &[String]) -> Result<GroupMeans> {
    let step = Step::Bivariate;
    let groups = partition(df, step, key)?;
    let columns: Vec<Vec<Option<f64>>> = value_columns
        .iter()
        .map(|c| float_values(df, step, c))
        .collect::<Result<_>>()?;

    let rows = groups
        .iter()
        .map(|(label, idx)| {
            let means = columns.iter().map(|col| mean(&gather(col, idx))).collect();
            (label.clone(), means)
        })
        .collect();

    Ok(GroupMeans {
        key: key.to_string(),
        value_columns: value_columns.to_vec(),
        rows,
    })
}

/// One box per group of `key`, groups sorted by label.
pub fn grouped_boxplots(df: &DataFrame, value: &str, key: &str) -> Result<Vec<BoxPlotStats>> {
    let step = Step::Bivariate;
    let values = float_values(df, step, value)?;
    let groups = partition(df, step, key)?;
    Ok(groups
        .iter()
        .filter_map(|(label, idx)| box_stats(label, &gather(&values, idx)))
        .collect())
}

/// Student t-test of `value` between rows where `key == group_a` and
/// `key == group_b`; nulls are dropped per group.
pub fn group_ttest(
    df: &DataFrame,
    value: &str,
    key: &str,
    group_a: &str,
    group_b: &str,
) -> Result<TTestResult> {
    let step = Step::Bivariate;
    let values = float_values(df, step, value)?;
    let groups = partition(df, step, key)?;
    let empty = Vec::new();
    let a = gather(&values, groups.get(group_a).unwrap_or(&empty));
    let b = gather(&values, groups.get(group_b).unwrap_or(&empty));

    ttest_independent(&a, &b)
        .map_err(|reason| EdaError::precondition(step, "t-test", &[value, key], reason))
}

/// Chi-square test of independence on the observed `row_key x column_key`
/// contingency table.
pub fn chi_square_test(df: &DataFrame, row_key: &str, column_key: &str) -> Result<ChiSquareResult> {
    let step = Step::Bivariate;
    let table = crosstab(df, step, &[(row_key, KeyOrder::Lexical)], column_key)?;
    chi_square_independence(&table.counts)
        .map_err(|reason| EdaError::precondition(step, "chi-square", &[row_key, column_key], reason))
}

/// Every relationship report of the bivariate step. Each analysis fails on
/// its own; the failures are kept next to the parts that succeeded.
#[derive(Debug, Default)]
pub struct BivariateReport {
    pub department_means: Option<GroupMeans>,
    pub gender_attrition: Option<CrossTab>,
    pub correlation: Option<CorrelationMatrix>,
    pub salary_by_department: Option<Vec<BoxPlotStats>>,
    pub engagement_by_outcome: Option<Vec<BoxPlotStats>>,
    pub salary_tenure: Option<PearsonTest>,
    pub engagement_ttest: Option<TTestResult>,
    pub department_chi_square: Option<ChiSquareResult>,
    pub failures: Vec<EdaError>,
}

fn keep<T>(result: Result<T>, failures: &mut Vec<EdaError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            failures.push(err);
            None
        }
    }
}

/// Run every bivariate analysis on the standard HR columns.
pub fn analyze_bivariate(df: &DataFrame, config: &EdaConfig) -> BivariateReport {
    use super::config::columns::*;

    let mut failures = Vec::new();
    let department_means = keep(group_means(df, DEPARTMENT, &config.group_mean_columns), &mut failures);
    let gender_attrition = keep(
        crosstab(df, Step::Bivariate, &[(GENDER, KeyOrder::Lexical)], RESIGNED),
        &mut failures,
    );
    let correlation = keep(correlation_matrix(df, &config.correlation_columns), &mut failures);
    let salary_by_department = keep(grouped_boxplots(df, SALARY, DEPARTMENT), &mut failures);
    let engagement_by_outcome = keep(grouped_boxplots(df, ENGAGEMENT_SCORE, RESIGNED), &mut failures);
    let salary_tenure = keep(pearson_test(df, SALARY, TENURE_MONTHS), &mut failures);
    let engagement_ttest = keep(
        group_ttest(
            df,
            ENGAGEMENT_SCORE,
            RESIGNED,
            &config.event_label,
            &config.non_event_label,
        ),
        &mut failures,
    );
    let department_chi_square = keep(chi_square_test(df, DEPARTMENT, RESIGNED), &mut failures);

    BivariateReport {
        department_means,
        gender_attrition,
        correlation,
        salary_by_department,
        engagement_by_outcome,
        salary_tenure,
        engagement_ttest,
        department_chi_square,
        failures,
    }
}
