//! Single-column distributions: summary, shape, normality, frequency

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::{EdaError, Result, Step};
use super::frame::{float_values, non_null, string_values};
use super::normality::{shapiro_wilk, ShapiroWilk};
use super::stats::{excess_kurtosis, quantile_sorted, skewness, sorted, std_dev, NumericSummary};

/// Equal-width histogram with a Gaussian KDE sampled at bin centres
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub column: String,
    /// `bins + 1` edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Estimated density at each bin centre
    pub density: Vec<f64>,
    pub bandwidth: f64,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }
}

/// Five-number box with 1.5 IQR whiskers
#[derive(Debug, Clone, Serialize)]
pub struct BoxPlotStats {
    pub label: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericUnivariate {
    pub summary: NumericSummary,
    pub range: f64,
    pub iqr: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
    /// `None` when the capped sample cannot be tested
    pub normality: Option<ShapiroWilk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normality_skipped: Option<String>,
    pub histogram: Histogram,
    pub boxplot: BoxPlotStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoricalUnivariate {
    pub column: String,
    pub total: usize,
    /// (label, count), count descending then label
    pub counts: Vec<(String, usize)>,
    pub percentages: Vec<f64>,
}

/// Scott's rule bandwidth `sigma * n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let sigma = std_dev(values, 1)?;
    if sigma <= 0.0 {
        return None;
    }
    Some(sigma * (values.len() as f64).powf(-0.2))
}

fn gaussian_kde(values: &[f64], bandwidth: f64, at: f64) -> f64 {
    let norm = values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt();
    values
        .iter()
        .map(|v| {
            let z = (at - v) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum::<f64>()
        / norm
}

/// Histogram over `bins` equal-width bins; `None` for fewer than two
/// values or a zero range.
pub fn histogram(column: &str, values: &[f64], bins: usize) -> Option<Histogram> {
    let bins = bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return None;
    }
    let bandwidth = scott_bandwidth(values)?;

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in values {
        // Last bin is closed on the right
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let density = (0..bins)
        .map(|i| gaussian_kde(values, bandwidth, min + width * (i as f64 + 0.5)))
        .collect();

    Some(Histogram {
        column: column.to_string(),
        edges,
        counts,
        density,
        bandwidth,
    })
}

/// Box statistics; `None` for an empty slice.
pub fn box_stats(label: &str, values: &[f64]) -> Option<BoxPlotStats> {
    let s = sorted(values);
    let q1 = quantile_sorted(&s, 0.25)?;
    let median = quantile_sorted(&s, 0.5)?;
    let q3 = quantile_sorted(&s, 0.75)?;
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = s.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence).collect();
    Some(BoxPlotStats {
        label: label.to_string(),
        count: s.len(),
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers: s.len() - inside.len(),
    })
}

impl NumericUnivariate {
    /// The Shapiro-Wilk failure, if the test was skipped.
    pub fn normality_error(&self) -> Option<EdaError> {
        self.normality_skipped.as_ref().map(|reason| {
            EdaError::precondition(Step::Univariate, "shapiro-wilk", &[self.summary.column.as_str()], reason.clone())
        })
    }
}

/// Full distribution report of one numeric column.
///
/// The normality test sees at most the first `normality_cap` non-null
/// values in row order. A failed normality test leaves the rest of the
/// report intact and is reported through `normality_skipped`.
pub fn analyze_numeric(
    df: &DataFrame,
    column: &str,
    normality_cap: usize,
    histogram_bins: usize,
) -> Result<NumericUnivariate> {
    let step = Step::Univariate;
    let values = non_null(&float_values(df, step, column)?);
    if values.is_empty() {
        return Err(EdaError::precondition(step, "distribution", &[column], "column has no non-null values"));
    }

    let summary = NumericSummary::from_values(column, &values);
    let range = summary.range().unwrap_or(0.0);
    if range <= 0.0 {
        return Err(EdaError::precondition(step, "distribution", &[column], "all values are identical"));
    }

    let capped = &values[..values.len().min(normality_cap)];
    let (normality, normality_skipped) = match shapiro_wilk(capped) {
        Ok(result) => (Some(result), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let histogram = histogram(column, &values, histogram_bins).ok_or_else(|| {
        EdaError::precondition(step, "histogram", &[column], "needs at least two distinct values")
    })?;
    let boxplot = box_stats(column, &values).ok_or_else(|| {
        EdaError::precondition(step, "boxplot", &[column], "column has no non-null values")
    })?;

    Ok(NumericUnivariate {
        iqr: summary.iqr().unwrap_or(0.0),
        skewness: skewness(&values).unwrap_or(0.0),
        excess_kurtosis: excess_kurtosis(&values).unwrap_or(0.0),
        range,
        summary,
        normality,
        normality_skipped,
        histogram,
        boxplot,
    })
}

/// Value counts and percentages of a categorical column, nulls ignored.
pub fn analyze_categorical(df: &DataFrame, column: &str) -> Result<CategoricalUnivariate> {
    let values = string_values(df, Step::Univariate, column)?;

    let mut tally: HashMap<String, usize> = HashMap::new();
    for v in values.into_iter().flatten() {
        *tally.entry(v).or_insert(0) += 1;
    }
    if tally.is_empty() {
        return Err(EdaError::precondition(
            Step::Univariate,
            "value counts",
            &[column],
            "column has no non-null values",
        ));
    }

    let mut counts: Vec<(String, usize)> = tally.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let percentages = counts
        .iter()
        .map(|(_, c)| *c as f64 / total as f64 * 100.0)
        .collect();

    Ok(CategoricalUnivariate {
        column: column.to_string(),
        total,
        counts,
        percentages,
    })
}
