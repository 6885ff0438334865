//! Derived features: log salary, salary per month of service, risk flag

use polars::prelude::*;
use tracing::{debug, info};

use super::config::columns::{
    AT_RISK, ENGAGEMENT_IMPUTED, SALARY, SALARY_CAPPED, SALARY_LOG, SALARY_PER_MONTH,
    TENURE_CAPPED, TENURE_MONTHS,
};
use super::config::RiskThresholds;
use super::error::{Result, Step};
use super::frame::{float_values, put_floats, put_ints};

/// `ln(1 + x)`; null below -1 where the logarithm is undefined.
pub fn log1p(value: Option<f64>) -> Option<f64> {
    value.filter(|x| *x >= -1.0).map(f64::ln_1p)
}

/// `numerator / denominator`, with an undefined quotient (null operand,
/// zero or non-finite result) reported as 0.
pub fn ratio_or_zero(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => {
            let q = n / d;
            if q.is_finite() {
                q
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// 1 when both engagement and tenure are below their thresholds, 0 when
/// either is not, null when either is unknown.
pub fn risk_flag(engagement: Option<f64>, tenure: Option<f64>, thresholds: &RiskThresholds) -> Option<i32> {
    let engagement = engagement.filter(|v| !v.is_nan())?;
    let tenure = tenure.filter(|v| !v.is_nan())?;
    Some((engagement < thresholds.engagement_below && tenure < thresholds.tenure_below) as i32)
}

pub fn add_salary_log(df: &mut DataFrame) -> Result<()> {
    let salary = float_values(df, Step::FeatureEngineering, SALARY_CAPPED)?;
    let logged: Vec<Option<f64>> = salary.iter().map(|v| log1p(*v)).collect();
    put_floats(df, Step::FeatureEngineering, SALARY_LOG, logged)
}

pub fn add_salary_per_month(df: &mut DataFrame) -> Result<()> {
    let salary = float_values(df, Step::FeatureEngineering, SALARY)?;
    let tenure = float_values(df, Step::FeatureEngineering, TENURE_MONTHS)?;

    let per_month: Vec<Option<f64>> = salary
        .iter()
        .zip(tenure.iter())
        .map(|(s, t)| Some(ratio_or_zero(*s, *t)))
        .collect();

    let zeroed = salary
        .iter()
        .zip(tenure.iter())
        .filter(|(s, t)| s.is_none() || t.map_or(true, |t| t == 0.0))
        .count();
    if zeroed > 0 {
        debug!(rows = zeroed, "undefined salary per month reported as 0");
    }

    put_floats(df, Step::FeatureEngineering, SALARY_PER_MONTH, per_month)
}

pub fn add_at_risk(df: &mut DataFrame, thresholds: &RiskThresholds) -> Result<()> {
    let engagement = float_values(df, Step::FeatureEngineering, ENGAGEMENT_IMPUTED)?;
    let tenure = float_values(df, Step::FeatureEngineering, TENURE_CAPPED)?;

    let flags: Vec<Option<i32>> = engagement
        .iter()
        .zip(tenure.iter())
        .map(|(e, t)| risk_flag(*e, *t, thresholds))
        .collect();

    let at_risk = flags.iter().filter(|f| **f == Some(1)).count();
    info!(at_risk, "flagged at-risk employees");

    put_ints(df, Step::FeatureEngineering, AT_RISK, flags)
}

/// Append `Salary_Log`, `Salary_per_Month_of_Service` and `At_Risk`.
pub fn engineer_features(df: &mut DataFrame, thresholds: &RiskThresholds) -> Result<()> {
    add_salary_log(df)?;
    add_salary_per_month(df)?;
    add_at_risk(df, thresholds)
}
