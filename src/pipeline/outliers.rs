//! Percentile capping of extreme values

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use super::config::columns::{SALARY, SALARY_CAPPED, TENURE_CAPPED, TENURE_MONTHS};
use super::error::{EdaError, Result, Step};
use super::frame::{float_values, non_null, put_floats};
use super::stats::{quantile_sorted, sorted};

/// Closed clipping range taken from two percentiles of a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileCaps {
    pub lower: f64,
    pub upper: f64,
}

impl QuantileCaps {
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// Caps at the `lower_q` and `upper_q` quantiles of the non-null values.
pub fn percentile_caps(
    df: &DataFrame,
    column: &str,
    lower_q: f64,
    upper_q: f64,
) -> Result<QuantileCaps> {
    let values = sorted(&non_null(&float_values(df, Step::Outliers, column)?));

    match (quantile_sorted(&values, lower_q), quantile_sorted(&values, upper_q)) {
        (Some(lower), Some(upper)) => Ok(QuantileCaps { lower, upper }),
        _ => Err(EdaError::precondition(
            Step::Outliers,
            "percentile caps",
            &[column],
            "column has no non-null values",
        )),
    }
}

/// Write `column` clipped into `caps` as `output`; nulls stay null.
/// Returns the number of values that moved.
pub fn apply_caps(
    df: &mut DataFrame,
    column: &str,
    caps: &QuantileCaps,
    output: &str,
) -> Result<usize> {
    let values = float_values(df, Step::Outliers, column)?;
    let mut clipped = 0usize;
    let capped: Vec<Option<f64>> = values
        .iter()
        .map(|v| {
            v.map(|x| {
                let c = caps.clip(x);
                if c != x {
                    clipped += 1;
                }
                c
            })
        })
        .collect();
    put_floats(df, Step::Outliers, output, capped)?;
    Ok(clipped)
}

/// Append `Salary_Capped` and `Tenure_Capped` at the configured percentiles.
pub fn treat_outliers(df: &mut DataFrame, lower_q: f64, upper_q: f64) -> Result<Vec<(String, QuantileCaps)>> {
    let mut applied = Vec::with_capacity(2);
    for (source, output) in [(SALARY, SALARY_CAPPED), (TENURE_MONTHS, TENURE_CAPPED)] {
        let caps = percentile_caps(df, source, lower_q, upper_q)?;
        let clipped = apply_caps(df, source, &caps, output)?;
        info!(column = source, lower = caps.lower, upper = caps.upper, clipped, "capped outliers");
        applied.push((output.to_string(), caps));
    }
    Ok(applied)
}
