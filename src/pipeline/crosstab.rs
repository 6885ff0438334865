//! Cross-tabulation of categorical keys

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::{Result, Step};
use super::frame::string_values;

/// How the labels of a row key are ordered.
#[derive(Debug, Clone)]
pub enum KeyOrder {
    /// Lexicographic order of the observed labels
    Lexical,
    /// Fixed label order; labels outside the list sort last
    Fixed(Vec<String>),
}

impl KeyOrder {
    fn rank(&self, label: &str) -> (usize, String) {
        match self {
            KeyOrder::Lexical => (0, label.to_string()),
            KeyOrder::Fixed(order) => (
                order.iter().position(|l| l == label).unwrap_or(order.len()),
                label.to_string(),
            ),
        }
    }
}

/// Contingency counts of one or more row keys against a column key.
///
/// Rows with a null in any key are excluded; only observed row
/// combinations appear.
#[derive(Debug, Clone, Serialize)]
pub struct CrossTab {
    pub row_keys: Vec<String>,
    pub column_key: String,
    pub row_labels: Vec<Vec<String>>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<f64>>,
}

impl CrossTab {
    /// Percentages normalized within each row (each row sums to 100).
    pub fn row_percentages(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: f64 = row.iter().sum();
                row.iter()
                    .map(|c| if total > 0.0 { c / total * 100.0 } else { 0.0 })
                    .collect()
            })
            .collect()
    }

    /// Row label joined for display, e.g. `<2 yrs / Low`.
    pub fn row_label(&self, row: usize) -> String {
        self.row_labels[row].join(" / ")
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count occurrences of each (row keys, column key) combination.
pub fn crosstab(
    df: &DataFrame,
    step: Step,
    row_keys: &[(&str, KeyOrder)],
    column_key: &str,
) -> Result<CrossTab> {
    let key_values: Vec<Vec<Option<String>>> = row_keys
        .iter()
        .map(|(name, _)| string_values(df, step, name))
        .collect::<Result<_>>()?;
    let column_values = string_values(df, step, column_key)?;

    // Row combination rank -> (labels, column label -> count)
    let mut table: BTreeMap<Vec<(usize, String)>, (Vec<String>, BTreeMap<String, f64>)> =
        BTreeMap::new();
    let mut column_labels: Vec<String> = Vec::new();

    'rows: for (row_idx, column_value) in column_values.iter().enumerate() {
        let Some(column_label) = column_value else {
            continue;
        };

        let mut labels = Vec::with_capacity(row_keys.len());
        for values in &key_values {
            match &values[row_idx] {
                Some(label) => labels.push(label.clone()),
                None => continue 'rows,
            }
        }

        let rank: Vec<(usize, String)> = labels
            .iter()
            .zip(row_keys.iter())
            .map(|(label, (_, order))| order.rank(label))
            .collect();

        let entry = table
            .entry(rank)
            .or_insert_with(|| (labels, BTreeMap::new()));
        *entry.1.entry(column_label.clone()).or_insert(0.0) += 1.0;

        if !column_labels.contains(column_label) {
            column_labels.push(column_label.clone());
        }
    }

    column_labels.sort();

    let mut row_labels = Vec::with_capacity(table.len());
    let mut counts = Vec::with_capacity(table.len());
    for (_, (labels, cells)) in table {
        counts.push(
            column_labels
                .iter()
                .map(|c| cells.get(c).copied().unwrap_or(0.0))
                .collect(),
        );
        row_labels.push(labels);
    }

    Ok(CrossTab {
        row_keys: row_keys.iter().map(|(name, _)| name.to_string()).collect(),
        column_key: column_key.to_string(),
        row_labels,
        column_labels,
        counts,
    })
}
