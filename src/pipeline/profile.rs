//! Structural profile of the loaded table

use polars::prelude::*;
use serde::Serialize;

use super::error::{Result, Step};
use super::frame::{float_values, non_null};
use super::loader::estimated_memory_mb;
use super::stats::NumericSummary;

/// Inferred role of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Other,
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            ColumnKind::Numeric
        } else if matches!(dtype, DataType::String | DataType::Boolean | DataType::Categorical(..)) {
            ColumnKind::Categorical
        } else {
            ColumnKind::Other
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
    pub non_null: usize,
}

/// Shape, schema, sample rows and numeric summaries of a table
#[derive(Debug, Clone)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub sample: DataFrame,
    pub numeric: Vec<NumericSummary>,
    pub memory_mb: f64,
}

impl DatasetProfile {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Profile `df` without touching it.
pub fn profile_dataset(df: &DataFrame, sample_rows: usize) -> Result<DatasetProfile> {
    let mut columns = Vec::with_capacity(df.width());
    let mut numeric = Vec::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        let kind = ColumnKind::of(col.dtype());
        columns.push(ColumnInfo {
            name: name.clone(),
            kind,
            dtype: col.dtype().to_string(),
            non_null: col.len() - col.null_count(),
        });

        if kind == ColumnKind::Numeric {
            let values = non_null(&float_values(df, Step::Profile, &name)?);
            numeric.push(NumericSummary::from_values(&name, &values));
        }
    }

    Ok(DatasetProfile {
        rows: df.height(),
        columns,
        sample: df.head(Some(sample_rows)),
        numeric,
        memory_mb: estimated_memory_mb(df),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_kinds_and_summaries() {
        let df = df! {
            "Age" => [Some(30i64), Some(40), None],
            "Department" => ["Sales", "IT", "HR"],
        }
        .unwrap();

        let profile = profile_dataset(&df, 2).unwrap();
        assert_eq!(profile.rows, 3);
        assert_eq!(profile.column_names(), vec!["Age", "Department"]);
        assert_eq!(profile.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(profile.columns[0].non_null, 2);
        assert_eq!(profile.columns[1].kind, ColumnKind::Categorical);
        assert_eq!(profile.sample.height(), 2);

        assert_eq!(profile.numeric.len(), 1);
        assert_eq!(profile.numeric[0].count, 2);
        assert_eq!(profile.numeric[0].mean, Some(35.0));
    }

    #[test]
    fn test_empty_table() {
        let df = df! {
            "Salary" => Vec::<f64>::new(),
        }
        .unwrap();
        let profile = profile_dataset(&df, 5).unwrap();
        assert_eq!(profile.rows, 0);
        assert_eq!(profile.numeric[0].count, 0);
        assert_eq!(profile.numeric[0].mean, None);
    }
}
