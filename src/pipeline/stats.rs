//! Descriptive statistics over plain float slices
//!
//! All functions expect null values to be filtered out beforehand.

use serde::Serialize;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - ddof) as f64).sqrt())
}

/// Sort a copy of the values ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Quantile of already-sorted values with linear interpolation between
/// order statistics (position `q * (n - 1)`).
pub fn quantile_sorted(sorted_values: &[f64], q: f64) -> Option<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted_values[lo] + (sorted_values[hi] - sorted_values[lo]) * frac)
}

/// Quantile of unsorted values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Central moment of order `k`.
fn central_moment(values: &[f64], m: f64, k: i32) -> f64 {
    values.iter().map(|v| (v - m).powi(k)).sum::<f64>() / values.len() as f64
}

/// Biased sample skewness `m3 / m2^1.5`.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let m2 = central_moment(values, m, 2);
    if m2 == 0.0 {
        return None;
    }
    Some(central_moment(values, m, 3) / m2.powf(1.5))
}

/// Biased excess kurtosis `m4 / m2^2 - 3`.
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let m2 = central_moment(values, m, 2);
    if m2 == 0.0 {
        return None;
    }
    Some(central_moment(values, m, 4) / (m2 * m2) - 3.0)
}

/// count / mean / std / min / quartiles / max of a numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let sorted_values = sorted(values);
        Self {
            column: column.to_string(),
            count: values.len(),
            mean: mean(values),
            std: std_dev(values, 1),
            min: sorted_values.first().copied(),
            q1: quantile_sorted(&sorted_values, 0.25),
            median: quantile_sorted(&sorted_values, 0.5),
            q3: quantile_sorted(&sorted_values, 0.75),
            max: sorted_values.last().copied(),
        }
    }

    /// max - min
    pub fn range(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }

    /// Q3 - Q1
    pub fn iqr(&self) -> Option<f64> {
        Some(self.q3? - self.q1?)
    }
}
