//! Missing value analysis and imputation

use std::collections::BTreeMap;

use polars::prelude::*;
use tracing::{debug, info};

use super::config::columns::{
    DEPARTMENT, ENGAGEMENT_IMPUTED, ENGAGEMENT_MISSING_FLAG, ENGAGEMENT_SCORE,
};
use super::error::{Result, Step};
use super::frame::{float_values, put_floats, put_ints, string_values};
use super::stats::median;

/// Per-column null ratio, sorted descending (ties by column order).
pub fn analyze_missing_values(df: &DataFrame) -> Vec<(String, f64)> {
    if df.height() == 0 {
        return Vec::new();
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count() as f64 / rows))
        .collect();

    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    missing_ratios
}

/// Presence/absence grid: `matrix[row][col]` is true where the cell is null.
#[derive(Debug, Clone)]
pub struct MissingMatrix {
    pub columns: Vec<String>,
    pub is_null: Vec<Vec<bool>>,
}

impl MissingMatrix {
    pub fn null_count(&self, column: usize) -> usize {
        self.is_null.iter().filter(|row| row[column]).count()
    }
}

pub fn missing_matrix(df: &DataFrame) -> MissingMatrix {
    let masks: Vec<Vec<bool>> = df
        .get_columns()
        .iter()
        .map(|col| {
            let mask = col.is_null();
            mask.into_iter().map(|v| v.unwrap_or(false)).collect()
        })
        .collect();

    let is_null = (0..df.height())
        .map(|row| masks.iter().map(|mask| mask[row]).collect())
        .collect();

    MissingMatrix {
        columns: df.get_column_names().iter().map(|s| s.to_string()).collect(),
        is_null,
    }
}

/// Fill nulls in `value` with the median of its `key` group.
///
/// Two passes: partition row indices by key, then scatter each group's
/// median (over its non-null values) into that group's nulls. A group with
/// no non-null values stays null; rows with a null key keep their value.
/// Returns the number of cells filled.
pub fn impute_group_median(
    df: &mut DataFrame,
    value: &str,
    key: &str,
    output: &str,
) -> Result<usize> {
    let step = Step::MissingValues;
    let values = float_values(df, step, value)?;
    let keys = string_values(df, step, key)?;

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, k) in keys.iter().enumerate() {
        if let Some(k) = k {
            groups.entry(k.as_str()).or_default().push(row);
        }
    }

    let mut imputed = values.clone();
    let mut filled = 0usize;
    for (group, rows) in &groups {
        let present: Vec<f64> = rows
            .iter()
            .filter_map(|&r| values[r])
            .filter(|v| !v.is_nan())
            .collect();
        let Some(fill) = median(&present) else {
            debug!(group, column = value, "group has no values; nulls left in place");
            continue;
        };
        for &r in rows {
            if values[r].is_none() {
                imputed[r] = Some(fill);
                filled += 1;
            }
        }
    }

    put_floats(df, step, output, imputed)?;
    Ok(filled)
}

/// Int32 indicator: 1 where `source` is null, else 0.
pub fn flag_missing(df: &mut DataFrame, source: &str, output: &str) -> Result<usize> {
    let values = float_values(df, Step::MissingValues, source)?;
    let flags: Vec<Option<i32>> = values.iter().map(|v| Some(v.is_none() as i32)).collect();
    let flagged = flags.iter().filter(|f| **f == Some(1)).count();
    put_ints(df, Step::MissingValues, output, flags)?;
    Ok(flagged)
}

/// Append `Engagement_Score_Imputed` and `Engagement_Missing_Flag`.
pub fn handle_missing(df: &mut DataFrame) -> Result<()> {
    let filled = impute_group_median(df, ENGAGEMENT_SCORE, DEPARTMENT, ENGAGEMENT_IMPUTED)?;
    let flagged = flag_missing(df, ENGAGEMENT_SCORE, ENGAGEMENT_MISSING_FLAG)?;
    info!(filled, flagged, "engagement score imputed by department median");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "Department" => [Some("Sales"), Some("Sales"), Some("Sales"), Some("IT"), Some("IT"), None, Some("HR")],
            "Engagement_Score" => [Some(2.0f64), Some(4.0), None, Some(9.0), None, None, None],
        }
        .unwrap()
    }

    #[test]
    fn test_impute_group_median() {
        let mut df = sample();
        let filled =
            impute_group_median(&mut df, "Engagement_Score", "Department", "Imputed").unwrap();
        assert_eq!(filled, 2);

        let imputed: Vec<Option<f64>> = df.column("Imputed").unwrap().f64().unwrap().iter().collect();
        assert_eq!(
            imputed,
            vec![Some(2.0), Some(4.0), Some(3.0), Some(9.0), Some(9.0), None, None]
        );
    }

    #[test]
    fn test_source_column_untouched() {
        let mut df = sample();
        impute_group_median(&mut df, "Engagement_Score", "Department", "Imputed").unwrap();
        assert_eq!(df.column("Engagement_Score").unwrap().null_count(), 4);
    }

    #[test]
    fn test_flag_missing() {
        let mut df = sample();
        let flagged = flag_missing(&mut df, "Engagement_Score", "Flag").unwrap();
        assert_eq!(flagged, 4);
        let flags: Vec<Option<i32>> = df.column("Flag").unwrap().i32().unwrap().iter().collect();
        assert_eq!(
            flags,
            vec![Some(0), Some(0), Some(1), Some(0), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn test_analyze_missing_values_sorted() {
        let ratios = analyze_missing_values(&sample());
        assert_eq!(ratios[0].0, "Engagement_Score");
        assert!((ratios[0].1 - 4.0 / 7.0).abs() < 1e-12);
        assert!((ratios[1].1 - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_matrix_shape() {
        let matrix = missing_matrix(&sample());
        assert_eq!(matrix.columns, vec!["Department", "Engagement_Score"]);
        assert_eq!(matrix.is_null.len(), 7);
        assert_eq!(matrix.null_count(0), 1);
        assert_eq!(matrix.null_count(1), 4);
    }

    #[test]
    fn test_empty_frame() {
        let df = df! {
            "Engagement_Score" => Vec::<f64>::new(),
        }
        .unwrap();
        assert!(analyze_missing_values(&df).is_empty());
    }
}
