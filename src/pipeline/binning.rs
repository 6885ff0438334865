//! Interval-table banding and the joint tenure/engagement breakdown
//!
//! Bands are right-closed `(lower, upper]`. A value at or below the first
//! lower bound, above the last upper bound, or null has no band.

use polars::prelude::*;
use tracing::debug;

use super::config::columns::{
    ENGAGEMENT_LEVEL, ENGAGEMENT_SCORE, RESIGNED, TENURE_GROUP, TENURE_MONTHS,
};
use super::crosstab::{crosstab, CrossTab, KeyOrder};
use super::error::{Result, Step};
use super::frame::{float_values, put_strings};

/// One `(lower, upper]` band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    pub label: &'static str,
}

/// Sorted, contiguous list of right-closed intervals.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTable {
    pub intervals: &'static [Interval],
}

impl IntervalTable {
    /// Label of the band containing `value`, if any.
    pub fn lookup(&self, value: f64) -> Option<&'static str> {
        if value.is_nan() {
            return None;
        }
        self.intervals
            .iter()
            .find(|iv| value > iv.lower && value <= iv.upper)
            .map(|iv| iv.label)
    }

    /// Band labels in ascending order.
    pub fn labels(&self) -> Vec<String> {
        self.intervals.iter().map(|iv| iv.label.to_string()).collect()
    }

    pub fn order(&self) -> KeyOrder {
        KeyOrder::Fixed(self.labels())
    }
}

pub const ENGAGEMENT_LEVELS: IntervalTable = IntervalTable {
    intervals: &[
        Interval { lower: 0.0, upper: 4.0, label: "Low" },
        Interval { lower: 4.0, upper: 7.0, label: "Medium" },
        Interval { lower: 7.0, upper: 10.0, label: "High" },
    ],
};

pub const TENURE_GROUPS: IntervalTable = IntervalTable {
    intervals: &[
        Interval { lower: 0.0, upper: 24.0, label: "<2 yrs" },
        Interval { lower: 24.0, upper: 60.0, label: "2–5 yrs" },
        Interval { lower: 60.0, upper: 120.0, label: "5+ yrs" },
    ],
};

/// Band a numeric column into a new string column.
pub fn band_column(
    df: &mut DataFrame,
    source: &str,
    output: &str,
    table: &IntervalTable,
) -> Result<()> {
    let values = float_values(df, Step::Multivariate, source)?;
    let bands: Vec<Option<&str>> = values
        .iter()
        .map(|v| v.and_then(|x| table.lookup(x)))
        .collect();

    let unbanded = bands
        .iter()
        .zip(values.iter())
        .filter(|(b, v)| b.is_none() && v.is_some())
        .count();
    if unbanded > 0 {
        debug!(source, unbanded, "values outside band table left without a band");
    }

    put_strings(df, Step::Multivariate, output, bands)
}

/// Append `Engagement_Level` and `Tenure_Group`.
pub fn derive_bands(df: &mut DataFrame) -> Result<()> {
    band_column(df, ENGAGEMENT_SCORE, ENGAGEMENT_LEVEL, &ENGAGEMENT_LEVELS)?;
    band_column(df, TENURE_MONTHS, TENURE_GROUP, &TENURE_GROUPS)
}

/// Resigned breakdown per (Tenure_Group, Engagement_Level) combination.
pub fn joint_crosstab(df: &DataFrame) -> Result<CrossTab> {
    crosstab(
        df,
        Step::Multivariate,
        &[
            (TENURE_GROUP, TENURE_GROUPS.order()),
            (ENGAGEMENT_LEVEL, ENGAGEMENT_LEVELS.order()),
        ],
        RESIGNED,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_boundaries() {
        assert_eq!(ENGAGEMENT_LEVELS.lookup(3.0), Some("Low"));
        assert_eq!(ENGAGEMENT_LEVELS.lookup(4.0), Some("Low"));
        assert_eq!(ENGAGEMENT_LEVELS.lookup(4.0001), Some("Medium"));
        assert_eq!(ENGAGEMENT_LEVELS.lookup(5.0), Some("Medium"));
        assert_eq!(ENGAGEMENT_LEVELS.lookup(7.0), Some("Medium"));
        assert_eq!(ENGAGEMENT_LEVELS.lookup(10.0), Some("High"));
        assert_eq!(ENGAGEMENT_LEVELS.lookup(0.0), None);
        assert_eq!(ENGAGEMENT_LEVELS.lookup(10.5), None);
        assert_eq!(ENGAGEMENT_LEVELS.lookup(-1.0), None);
        assert_eq!(ENGAGEMENT_LEVELS.lookup(f64::NAN), None);
    }

    #[test]
    fn test_tenure_boundaries() {
        assert_eq!(TENURE_GROUPS.lookup(24.0), Some("<2 yrs"));
        assert_eq!(TENURE_GROUPS.lookup(25.0), Some("2–5 yrs"));
        assert_eq!(TENURE_GROUPS.lookup(60.0), Some("2–5 yrs"));
        assert_eq!(TENURE_GROUPS.lookup(61.0), Some("5+ yrs"));
        assert_eq!(TENURE_GROUPS.lookup(120.0), Some("5+ yrs"));
        assert_eq!(TENURE_GROUPS.lookup(0.0), None);
        assert_eq!(TENURE_GROUPS.lookup(121.0), None);
    }

    #[test]
    fn test_band_column_keeps_nulls() {
        let mut df = df! {
            "score" => [Some(3.0f64), None, Some(0.0), Some(9.0)],
        }
        .unwrap();
        band_column(&mut df, "score", "level", &ENGAGEMENT_LEVELS).unwrap();

        let levels: Vec<Option<&str>> = df.column("level").unwrap().str().unwrap().iter().collect();
        assert_eq!(levels, vec![Some("Low"), None, None, Some("High")]);
    }
}
