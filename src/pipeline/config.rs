//! Run configuration and column names

use serde::Serialize;

use super::iv::BinningConfig;

/// Column names read and written by the pipeline.
pub mod columns {
    pub const AGE: &str = "Age";
    pub const TENURE_MONTHS: &str = "Tenure_Months";
    pub const SALARY: &str = "Salary";
    pub const ENGAGEMENT_SCORE: &str = "Engagement_Score";
    pub const DEPARTMENT: &str = "Department";
    pub const GENDER: &str = "Gender";
    pub const RESIGNED: &str = "Resigned";

    pub const ENGAGEMENT_LEVEL: &str = "Engagement_Level";
    pub const TENURE_GROUP: &str = "Tenure_Group";
    pub const ENGAGEMENT_IMPUTED: &str = "Engagement_Score_Imputed";
    pub const ENGAGEMENT_MISSING_FLAG: &str = "Engagement_Missing_Flag";
    pub const SALARY_CAPPED: &str = "Salary_Capped";
    pub const TENURE_CAPPED: &str = "Tenure_Capped";
    pub const SALARY_LOG: &str = "Salary_Log";
    pub const SALARY_PER_MONTH: &str = "Salary_per_Month_of_Service";
    pub const AT_RISK: &str = "At_Risk";

    /// Columns the input must provide.
    pub const REQUIRED: [&str; 7] = [
        AGE,
        TENURE_MONTHS,
        SALARY,
        ENGAGEMENT_SCORE,
        DEPARTMENT,
        GENDER,
        RESIGNED,
    ];
}

/// Thresholds that define the At_Risk flag.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RiskThresholds {
    /// Engagement strictly below this is low engagement
    pub engagement_below: f64,
    /// Tenure (months) strictly below this is short tenure
    pub tenure_below: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            engagement_below: 5.0,
            tenure_below: 24.0,
        }
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct EdaConfig {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    /// Numeric columns for the Pearson correlation matrix
    pub correlation_columns: Vec<String>,
    /// Value columns averaged per department
    pub group_mean_columns: Vec<String>,
    /// Rows shown in the structural profile sample
    pub sample_rows: usize,
    /// Maximum number of values fed to the normality test
    pub normality_cap: usize,
    /// Histogram bin count for distribution plots
    pub histogram_bins: usize,
    pub lower_percentile: f64,
    pub upper_percentile: f64,
    pub risk: RiskThresholds,
    /// Features scored by the ranker, in report order
    pub ranking_features: Vec<String>,
    /// Label of the outcome column mapped to 1
    pub event_label: String,
    /// Label of the outcome column mapped to 0
    pub non_event_label: String,
    /// Neighbours used by the mutual information estimator
    pub mi_neighbors: usize,
    /// Seed for the mutual information tie-breaking jitter
    pub seed: u64,
    pub binning: BinningConfig,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for EdaConfig {
    fn default() -> Self {
        use columns::*;

        let numeric = [AGE, TENURE_MONTHS, SALARY, ENGAGEMENT_SCORE];
        Self {
            numeric_columns: owned(&numeric),
            categorical_columns: owned(&[DEPARTMENT, GENDER, RESIGNED]),
            correlation_columns: owned(&numeric),
            group_mean_columns: owned(&[SALARY, TENURE_MONTHS, ENGAGEMENT_SCORE]),
            sample_rows: 5,
            normality_cap: 500,
            histogram_bins: 30,
            lower_percentile: 0.01,
            upper_percentile: 0.99,
            risk: RiskThresholds::default(),
            ranking_features: owned(&[ENGAGEMENT_IMPUTED, AT_RISK, TENURE_CAPPED, SALARY_LOG]),
            event_label: "Yes".to_string(),
            non_event_label: "No".to_string(),
            mi_neighbors: 3,
            seed: 42,
            binning: BinningConfig::default(),
        }
    }
}
