//! Error kinds raised by the analysis pipeline.
//!
//! Every variant names the step that failed and the column(s) involved so a
//! failure can be diagnosed from the console output alone.

use std::fmt;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Pipeline step identifiers, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Step {
    Load,
    Profile,
    Univariate,
    Bivariate,
    Multivariate,
    MissingValues,
    Outliers,
    FeatureEngineering,
    FeatureRanking,
}

impl Step {
    /// Mutating steps append columns that later steps read, so their
    /// failures abort the run. Report steps fail in isolation.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Step::Load
                | Step::Multivariate
                | Step::MissingValues
                | Step::Outliers
                | Step::FeatureEngineering
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Load => "load",
            Step::Profile => "profile",
            Step::Univariate => "univariate",
            Step::Bivariate => "bivariate",
            Step::Multivariate => "multivariate",
            Step::MissingValues => "missing-values",
            Step::Outliers => "outliers",
            Step::FeatureEngineering => "feature-engineering",
            Step::FeatureRanking => "feature-ranking",
        };
        write!(f, "{}", name)
    }
}

/// Errors produced by the pipeline.
#[derive(Debug, Error)]
pub enum EdaError {
    /// Input file missing, unreadable, or not tabular.
    #[error("[{step}] failed to load '{}': {reason}", .path.display())]
    Load {
        step: Step,
        path: PathBuf,
        reason: String,
    },

    /// A column the pipeline depends on is absent.
    #[error("[{step}] required column '{column}' not found")]
    Schema { step: Step, column: String },

    /// Statistical input is degenerate (too few samples, zero variance, ...).
    #[error("[{step}] {test} on {}: {reason}", .columns.join(", "))]
    StatisticalPrecondition {
        step: Step,
        test: String,
        columns: Vec<String>,
        reason: String,
    },

    /// Polars failed while reading or writing a named column.
    #[error("[{step}] data error on column '{column}': {source}")]
    Data {
        step: Step,
        column: String,
        #[source]
        source: PolarsError,
    },
}

impl EdaError {
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EdaError::Load {
            step: Step::Load,
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn precondition(
        step: Step,
        test: &str,
        columns: &[&str],
        reason: impl Into<String>,
    ) -> Self {
        EdaError::StatisticalPrecondition {
            step,
            test: test.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            reason: reason.into(),
        }
    }

    pub fn data(step: Step, column: &str, source: PolarsError) -> Self {
        EdaError::Data {
            step,
            column: column.to_string(),
            source,
        }
    }

    /// Step that raised the error.
    pub fn step(&self) -> Step {
        match self {
            EdaError::Load { step, .. }
            | EdaError::Schema { step, .. }
            | EdaError::StatisticalPrecondition { step, .. }
            | EdaError::Data { step, .. } => *step,
        }
    }

    /// Column names involved in the failure (empty for load errors).
    pub fn columns(&self) -> Vec<String> {
        match self {
            EdaError::Load { .. } => Vec::new(),
            EdaError::Schema { column, .. } | EdaError::Data { column, .. } => {
                vec![column.clone()]
            }
            EdaError::StatisticalPrecondition { columns, .. } => columns.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EdaError>;

/// Attach step and column context to polars results.
pub trait PolarsResultExt<T> {
    fn in_step(self, step: Step, column: &str) -> Result<T>;
}

impl<T> PolarsResultExt<T> for std::result::Result<T, PolarsError> {
    fn in_step(self, step: Step, column: &str) -> Result<T> {
        self.map_err(|e| EdaError::data(step, column, e))
    }
}
