//! Tests for missing value analysis, imputation and flags

use attrition_eda::pipeline::columns;
use attrition_eda::pipeline::missing::{
    analyze_missing_values, flag_missing, handle_missing, impute_group_median, missing_matrix,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_missing_ratios_sorted_descending() {
    let df = df! {
        "complete" => [1.0f64, 2.0, 3.0, 4.0],
        "half" => [Some(1.0f64), None, Some(3.0), None],
        "quarter" => [Some(1.0f64), None, Some(3.0), Some(4.0)],
    }
    .unwrap();

    let ratios = analyze_missing_values(&df);
    assert_eq!(ratios[0], ("half".to_string(), 0.5));
    assert_eq!(ratios[1], ("quarter".to_string(), 0.25));
    assert_eq!(ratios[2], ("complete".to_string(), 0.0));
}

#[test]
fn test_missing_matrix_matches_null_counts() {
    let df = common::create_hr_dataframe(200, 5);
    let matrix = missing_matrix(&df);
    assert_eq!(matrix.is_null.len(), 200);

    let engagement = matrix
        .columns
        .iter()
        .position(|c| c == columns::ENGAGEMENT_SCORE)
        .unwrap();
    assert_eq!(
        matrix.null_count(engagement),
        df.column(columns::ENGAGEMENT_SCORE).unwrap().null_count()
    );
}

#[test]
fn test_flag_is_one_exactly_where_source_was_null() {
    let mut df = common::create_hr_dataframe(300, 6);
    let original = common::floats(&df, columns::ENGAGEMENT_SCORE);
    handle_missing(&mut df).unwrap();

    let flags: Vec<Option<i32>> = df
        .column(columns::ENGAGEMENT_MISSING_FLAG)
        .unwrap()
        .i32()
        .unwrap()
        .iter()
        .collect();
    for (flag, value) in flags.iter().zip(&original) {
        assert_eq!(*flag, Some(value.is_none() as i32));
    }
}

#[test]
fn test_group_median_fill() {
    let mut df = df! {
        "Department" => [Some("IT"), Some("IT"), Some("IT"), Some("HR"), Some("HR"), None, Some("Ops")],
        "Engagement_Score" => [Some(2.0f64), Some(8.0), None, Some(5.0), None, None, None],
    }
    .unwrap();

    let filled = impute_group_median(
        &mut df,
        columns::ENGAGEMENT_SCORE,
        columns::DEPARTMENT,
        columns::ENGAGEMENT_IMPUTED,
    )
    .unwrap();

    assert_eq!(filled, 2);
    assert_eq!(
        common::floats(&df, columns::ENGAGEMENT_IMPUTED),
        vec![Some(2.0), Some(8.0), Some(5.0), Some(5.0), Some(5.0), None, None]
    );
    // Source column untouched
    assert_eq!(df.column(columns::ENGAGEMENT_SCORE).unwrap().null_count(), 4);
}

#[test]
fn test_imputed_has_no_nulls_when_every_group_has_values() {
    let mut df = common::create_hr_dataframe(500, 8);
    handle_missing(&mut df).unwrap();
    assert_eq!(df.column(columns::ENGAGEMENT_IMPUTED).unwrap().null_count(), 0);
}

#[test]
fn test_flag_missing_counts() {
    let mut df = df! {
        "x" => [None, Some(1.0f64), None],
    }
    .unwrap();
    assert_eq!(flag_missing(&mut df, "x", "x_flag").unwrap(), 2);
}
