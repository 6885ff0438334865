//! Outcome column mapping
//!
//! `Resigned` holds string labels; the ranking estimators need a binary
//! 0/1 mask. Rows whose label matches neither side are ignored.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{EdaError, Result, Step};
use super::frame::string_values;

/// Mapping configuration for converting outcome labels to binary 0/1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    pub fn new(event_value: impl Into<String>, non_event_value: impl Into<String>) -> Self {
        Self {
            event_value: event_value.into(),
            non_event_value: non_event_value.into(),
        }
    }

    fn map(&self, label: Option<&str>) -> Option<i32> {
        match label {
            Some(s) if s == self.event_value => Some(1),
            Some(s) if s == self.non_event_value => Some(0),
            _ => None,
        }
    }
}

/// Event / non-event / ignored row counts of a mapped outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetCounts {
    pub events: usize,
    pub non_events: usize,
    pub ignored: usize,
}

/// Create a binary target mask based on the mapping
///
/// Returns a `Vec<Option<i32>>` where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for nulls and values that match neither label
pub fn create_target_mask(
    df: &DataFrame,
    step: Step,
    target: &str,
    mapping: &TargetMapping,
) -> Result<Vec<Option<i32>>> {
    let labels = string_values(df, step, target)?;
    Ok(labels.iter().map(|v| mapping.map(v.as_deref())).collect())
}

pub fn count_mapped(mask: &[Option<i32>]) -> TargetCounts {
    TargetCounts {
        events: mask.iter().filter(|v| **v == Some(1)).count(),
        non_events: mask.iter().filter(|v| **v == Some(0)).count(),
        ignored: mask.iter().filter(|v| v.is_none()).count(),
    }
}

/// Mask and counts, failing unless both classes are present.
pub fn binary_target(
    df: &DataFrame,
    step: Step,
    target: &str,
    mapping: &TargetMapping,
) -> Result<(Vec<Option<i32>>, TargetCounts)> {
    let mask = create_target_mask(df, step, target, mapping)?;
    let counts = count_mapped(&mask);

    if counts.events == 0 || counts.non_events == 0 {
        return Err(EdaError::precondition(
            step,
            "binary target",
            &[target],
            format!(
                "needs both '{}' and '{}' rows (got {} and {})",
                mapping.event_value, mapping.non_event_value, counts.events, counts.non_events
            ),
        ));
    }

    Ok((mask, counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_target_mask() {
        let df = df! {
            "Resigned" => [Some("No"), Some("Yes"), Some("No"), Some("Yes"), Some("Maybe"), None],
        }
        .unwrap();

        let mapping = TargetMapping::new("Yes", "No");
        let mask = create_target_mask(&df, Step::FeatureRanking, "Resigned", &mapping).unwrap();

        assert_eq!(mask, vec![Some(0), Some(1), Some(0), Some(1), None, None]);
    }

    #[test]
    fn test_count_mapped() {
        let counts = count_mapped(&[Some(1), Some(0), None, Some(1), None]);
        assert_eq!(
            counts,
            TargetCounts {
                events: 2,
                non_events: 1,
                ignored: 2
            }
        );
    }

    #[test]
    fn test_binary_target_requires_both_classes() {
        let df = df! {
            "Resigned" => ["No", "No", "No"],
        }
        .unwrap();

        let err = binary_target(
            &df,
            Step::FeatureRanking,
            "Resigned",
            &TargetMapping::new("Yes", "No"),
        )
        .unwrap_err();
        assert!(matches!(err, EdaError::StatisticalPrecondition { .. }));
    }

    #[test]
    fn test_missing_target_column_is_schema_error() {
        let df = df! {
            "Salary" => [1.0f64],
        }
        .unwrap();

        let err = create_target_mask(
            &df,
            Step::FeatureRanking,
            "Resigned",
            &TargetMapping::new("Yes", "No"),
        )
        .unwrap_err();
        assert!(matches!(err, EdaError::Schema { .. }));
    }
}
