//! Pearson correlation matrix and significance test

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use super::error::{EdaError, Result, Step};
use super::frame::float_values;
use super::hypothesis::t_two_sided_p;

/// Pairwise Pearson correlation matrix over named numeric columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Symmetric, unit diagonal; NaN where a pair has no variance
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[(i, j)])
    }
}

/// Result of a Pearson correlation test.
#[derive(Debug, Clone, Serialize)]
pub struct PearsonTest {
    pub column_x: String,
    pub column_y: String,
    pub n: usize,
    pub r: f64,
    pub p_value: f64,
}

/// Pearson correlation over rows where both values are present, using
/// Welford's single-pass update for numerical stability.
///
/// Returns `(r, n)` or `None` when fewer than two pairs exist or either
/// side has zero variance.
pub fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> Option<(f64, usize)> {
    let mut n = 0usize;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (a, b) in x.iter().zip(y.iter()) {
        if let (Some(a), Some(b)) = (a, b) {
            if a.is_nan() || b.is_nan() {
                continue;
            }
            n += 1;
            let dx = a - mean_x;
            let dy = b - mean_y;
            mean_x += dx / n as f64;
            mean_y += dy / n as f64;
            var_x += dx * (a - mean_x);
            var_y += dy * (b - mean_y);
            cov_xy += dx * (b - mean_y);
        }
    }

    if n < 2 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    Some((r.clamp(-1.0, 1.0), n))
}

/// Full pairwise Pearson correlation matrix, pairwise-complete observations.
///
/// An all-null input column fails; a pair without variance yields NaN.
pub fn correlation_matrix(df: &DataFrame, columns: &[String]) -> Result<CorrelationMatrix> {
    let data: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| float_values(df, Step::Bivariate, c))
        .collect::<Result<_>>()?;

    for (name, values) in columns.iter().zip(data.iter()) {
        if values.iter().all(|v| v.is_none()) {
            return Err(EdaError::precondition(
                Step::Bivariate,
                "correlation matrix",
                &[name.as_str()],
                "column has no non-null values",
            ));
        }
    }

    let k = columns.len();
    let mut values = Mat::<f64>::zeros(k, k);
    for i in 0..k {
        values[(i, i)] = 1.0;
        for j in (i + 1)..k {
            let r = pearson_pairwise(&data[i], &data[j])
                .map(|(r, _)| r)
                .unwrap_or(f64::NAN);
            values[(i, j)] = r;
            values[(j, i)] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Pearson correlation test with a two-sided p-value from the t
/// distribution on `n - 2` degrees of freedom.
pub fn pearson_test(df: &DataFrame, column_x: &str, column_y: &str) -> Result<PearsonTest> {
    let x = float_values(df, Step::Bivariate, column_x)?;
    let y = float_values(df, Step::Bivariate, column_y)?;

    let (r, n) = pearson_pairwise(&x, &y).ok_or_else(|| {
        EdaError::precondition(
            Step::Bivariate,
            "pearson correlation test",
            &[column_x, column_y],
            "needs at least 2 complete pairs with non-zero variance",
        )
    })?;

    let p_value = if n < 3 {
        1.0
    } else if r.abs() >= 1.0 {
        0.0
    } else {
        let df_t = (n - 2) as f64;
        let t = r * (df_t / (1.0 - r * r)).sqrt();
        t_two_sided_p(t, df_t).unwrap_or(f64::NAN)
    };

    Ok(PearsonTest {
        column_x: column_x.to_string(),
        column_y: column_y.to_string(),
        n,
        r,
        p_value,
    })
}
