//! Tests for the engineered features

use attrition_eda::pipeline::columns;
use attrition_eda::pipeline::features::{engineer_features, ratio_or_zero, risk_flag};
use attrition_eda::pipeline::RiskThresholds;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

fn engineered() -> DataFrame {
    let mut df = df! {
        "Salary" => [Some(50000.0f64), Some(60000.0), None, Some(48000.0), Some(70000.0)],
        "Tenure_Months" => [Some(0.0f64), Some(12.0), Some(30.0), None, Some(100.0)],
        "Salary_Capped" => [Some(50000.0f64), Some(60000.0), None, Some(48000.0), Some(70000.0)],
        "Tenure_Capped" => [Some(1.0f64), Some(12.0), Some(30.0), None, Some(100.0)],
        "Engagement_Score_Imputed" => [Some(3.0f64), Some(4.9), Some(2.0), Some(3.0), None],
    }
    .unwrap();
    engineer_features(&mut df, &RiskThresholds::default()).unwrap();
    df
}

#[test]
fn test_salary_per_month_undefined_is_zero() {
    let df = engineered();
    let per_month = common::floats(&df, columns::SALARY_PER_MONTH);
    assert_eq!(per_month[0], Some(0.0));
    assert_eq!(per_month[1], Some(5000.0));
    assert_eq!(per_month[2], Some(0.0));
    assert_eq!(per_month[3], Some(0.0));
    assert_eq!(df.column(columns::SALARY_PER_MONTH).unwrap().null_count(), 0);
}

#[test]
fn test_salary_log_follows_capped_salary() {
    let df = engineered();
    let logs = common::floats(&df, columns::SALARY_LOG);
    assert!((logs[0].unwrap() - 50001.0f64.ln()).abs() < 1e-12);
    assert_eq!(logs[2], None);
}

#[test]
fn test_at_risk_needs_both_conditions() {
    let df = engineered();
    let flags: Vec<Option<i32>> = df
        .column(columns::AT_RISK)
        .unwrap()
        .i32()
        .unwrap()
        .iter()
        .collect();
    // Tenure of 30 months is not short; null operands give null
    assert_eq!(flags, vec![Some(1), Some(1), Some(0), None, None]);
}

#[test]
fn test_helpers_directly() {
    let t = RiskThresholds::default();
    assert_eq!(risk_flag(Some(5.0), Some(10.0), &t), Some(0));
    assert_eq!(risk_flag(Some(4.0), Some(23.9), &t), Some(1));
    assert_eq!(risk_flag(Some(9.0), Some(24.0), &t), Some(0));
    assert_eq!(ratio_or_zero(Some(1.0), Some(0.0)), 0.0);
    assert_eq!(ratio_or_zero(Some(10.0), Some(4.0)), 2.5);
}
