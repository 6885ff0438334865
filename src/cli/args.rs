//! Command-line argument definitions using clap

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::normality::{MAX_SAMPLES, MIN_SAMPLES};
use crate::pipeline::{EdaConfig, MonotonicityConstraint};

/// Upper bound on `--prebins`; the optimal merge grows with the fourth power
const MAX_PREBINS: usize = 50;

/// attrition-eda - Exploratory analysis of an employee attrition dataset
#[derive(Parser, Debug)]
#[command(name = "attrition-eda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (XLSX, XLS, ODS, CSV or Parquet)
    #[arg(short, long, default_value = "HR_Attrition_Dataset_1000.xlsx")]
    pub input: PathBuf,

    /// Worksheet to read (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Seed of the tie-breaking jitter in the mutual information estimator
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Maximum number of values passed to the Shapiro-Wilk test (first N non-null rows)
    #[arg(long, default_value = "500")]
    pub normality_cap: usize,

    /// Rows shown in the structural profile sample
    #[arg(long, default_value = "5")]
    pub sample_rows: usize,

    /// Value in the Resigned column that represents the EVENT (maps to 1)
    #[arg(long, default_value = "Yes")]
    pub event_value: String,

    /// Value in the Resigned column that represents the NON-EVENT (maps to 0)
    #[arg(long, default_value = "No")]
    pub non_event_value: String,

    /// Number of CART prebins before the optimal merge
    #[arg(long, default_value = "20")]
    pub prebins: usize,

    /// Minimum prebin size as percentage of non-missing samples (0-100)
    #[arg(long, default_value = "5.0", value_parser = validate_min_prebin_pct)]
    pub min_prebin_pct: f64,

    /// Monotonicity constraint for the WoE trend.
    /// Options: "none", "ascending", "descending", "auto" (default)
    #[arg(long, default_value = "auto")]
    pub monotonicity: MonotonicityConstraint,

    /// Skip text plots
    #[arg(long, default_value = "false")]
    pub no_plots: bool,

    /// Print the feature ranking and run summary as JSON instead of the console report
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Increase diagnostic log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the run configuration, starting from the defaults.
    pub fn to_config(&self) -> Result<EdaConfig> {
        if self.event_value == self.non_event_value {
            bail!(
                "--event-value and --non-event-value must differ (both are '{}')",
                self.event_value
            );
        }
        if !(2..=MAX_PREBINS).contains(&self.prebins) {
            bail!("--prebins must be between 2 and {}, got {}", MAX_PREBINS, self.prebins);
        }
        if !(MIN_SAMPLES..=MAX_SAMPLES).contains(&self.normality_cap) {
            bail!(
                "--normality-cap must be between {} and {}, got {}",
                MIN_SAMPLES,
                MAX_SAMPLES,
                self.normality_cap
            );
        }

        let mut config = EdaConfig {
            seed: self.seed,
            normality_cap: self.normality_cap,
            sample_rows: self.sample_rows,
            event_label: self.event_value.clone(),
            non_event_label: self.non_event_value.clone(),
            ..EdaConfig::default()
        };
        config.binning.max_prebins = self.prebins;
        config.binning.min_prebin_fraction = self.min_prebin_pct / 100.0;
        config.binning.monotonicity = self.monotonicity;
        Ok(config)
    }
}

/// Validator for min_prebin_pct parameter
fn validate_min_prebin_pct(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=100.0).contains(&value) {
        Err(format!(
            "min_prebin_pct must be between 0.0 and 100.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
