//! Two-sample t-test and chi-square test of independence

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};

use super::stats::mean;

/// Student two-sample t-test result (pooled variance).
#[derive(Debug, Clone, Serialize)]
pub struct TTestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    pub mean_a: f64,
    pub mean_b: f64,
    pub n_a: usize,
    pub n_b: usize,
}

/// Chi-square test of independence on a contingency table.
#[derive(Debug, Clone, Serialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    /// Yates' continuity correction applied (only when dof == 1)
    pub yates_corrected: bool,
    pub expected: Vec<Vec<f64>>,
}

/// Two-sided p-value of a t statistic.
pub fn t_two_sided_p(statistic: f64, degrees_of_freedom: f64) -> Option<f64> {
    if !statistic.is_finite() {
        return Some(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).ok()?;
    Some((2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0))
}

/// Independent two-sample t-test with equal variances.
///
/// Fails with a reason string when either sample has fewer than two values or
/// the pooled variance is zero.
pub fn ttest_independent(a: &[f64], b: &[f64]) -> Result<TTestResult, String> {
    let (n_a, n_b) = (a.len(), b.len());
    if n_a < 2 || n_b < 2 {
        return Err(format!(
            "each group needs at least 2 values (got {} and {})",
            n_a, n_b
        ));
    }

    let mean_a = mean(a).unwrap_or(f64::NAN);
    let mean_b = mean(b).unwrap_or(f64::NAN);
    let ss_a: f64 = a.iter().map(|v| (v - mean_a).powi(2)).sum();
    let ss_b: f64 = b.iter().map(|v| (v - mean_b).powi(2)).sum();

    let df = (n_a + n_b - 2) as f64;
    let pooled_var = (ss_a + ss_b) / df;
    if pooled_var <= 0.0 {
        return Err("pooled variance is zero".to_string());
    }

    let se = (pooled_var * (1.0 / n_a as f64 + 1.0 / n_b as f64)).sqrt();
    let statistic = (mean_a - mean_b) / se;
    let p_value = t_two_sided_p(statistic, df)
        .ok_or_else(|| format!("invalid degrees of freedom {}", df))?;

    Ok(TTestResult {
        statistic,
        p_value,
        degrees_of_freedom: df,
        mean_a,
        mean_b,
        n_a,
        n_b,
    })
}

/// Chi-square test of independence on observed counts (rows x columns).
pub fn chi_square_independence(observed: &[Vec<f64>]) -> Result<ChiSquareResult, String> {
    let n_rows = observed.len();
    let n_cols = observed.first().map(|r| r.len()).unwrap_or(0);
    if n_rows < 2 || n_cols < 2 {
        return Err(format!(
            "contingency table must be at least 2x2 (got {}x{})",
            n_rows, n_cols
        ));
    }
    if observed.iter().any(|r| r.len() != n_cols) {
        return Err("contingency table rows have different lengths".to_string());
    }

    let row_totals: Vec<f64> = observed.iter().map(|r| r.iter().sum()).collect();
    let col_totals: Vec<f64> = (0..n_cols)
        .map(|j| observed.iter().map(|r| r[j]).sum())
        .collect();
    let total: f64 = row_totals.iter().sum();

    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|rt| col_totals.iter().map(|ct| rt * ct / total).collect())
        .collect();

    if expected.iter().flatten().any(|e| *e <= 0.0) {
        return Err("an expected frequency is zero".to_string());
    }

    let dof = (n_rows - 1) * (n_cols - 1);
    let yates = dof == 1;

    let mut statistic = 0.0;
    for (obs_row, exp_row) in observed.iter().zip(expected.iter()) {
        for (o, e) in obs_row.iter().zip(exp_row.iter()) {
            let mut diff = (o - e).abs();
            if yates {
                diff = (diff - 0.5).max(0.0);
            }
            statistic += diff * diff / e;
        }
    }

    let dist = ChiSquared::new(dof as f64).map_err(|e| e.to_string())?;
    let p_value = (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0);

    Ok(ChiSquareResult {
        statistic,
        p_value,
        degrees_of_freedom: dof,
        yates_corrected: yates,
        expected,
    })
}
