//! Step orchestration over one owned table
//!
//! Steps run in a fixed order. Report steps that fail are logged, recorded
//! in the [`RunSummary`] and skipped; a failing load or mutating step ends
//! the run with its error.

use std::path::Path;
use std::time::Instant;

use comfy_table::Table;
use indicatif::ProgressBar;
use polars::prelude::*;
use tracing::{info, warn};

use crate::report::tables::{self, print_table};
use crate::report::{Plot, PlotSink, RunSummary, StepFailure};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, hidden_spinner, print_info,
    print_section, print_step_header, print_success, print_warning,
};

use super::binning::{derive_bands, joint_crosstab};
use super::bivariate::{analyze_bivariate, BivariateReport};
use super::config::{columns, EdaConfig};
use super::crosstab::CrossTab;
use super::error::{EdaError, Result, Step};
use super::features::engineer_features;
use super::frame::require_columns;
use super::loader::load_dataset;
use super::missing::{analyze_missing_values, handle_missing, missing_matrix};
use super::mutual_info::MiConfig;
use super::outliers::{treat_outliers, QuantileCaps};
use super::profile::{profile_dataset, DatasetProfile};
use super::ranking::{rank_features, FeatureRanking};
use super::target::TargetMapping;
use super::univariate::{analyze_categorical, analyze_numeric, CategoricalUnivariate, NumericUnivariate};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print step headers, tables and spinners to stdout
    pub show_progress: bool,
}

/// Everything a run produced
#[derive(Debug)]
pub struct RunOutcome {
    /// The table with every derived column appended
    pub data: DataFrame,
    pub summary: RunSummary,
    pub profile: Option<DatasetProfile>,
    pub numeric: Vec<NumericUnivariate>,
    pub categorical: Vec<CategoricalUnivariate>,
    pub bivariate: BivariateReport,
    pub joint_attrition: Option<CrossTab>,
    pub missing_ratios: Vec<(String, f64)>,
    pub caps: Vec<(String, QuantileCaps)>,
    pub ranking: Option<FeatureRanking>,
}

fn title(step: Step) -> &'static str {
    match step {
        Step::Load => "Load Dataset",
        Step::Profile => "Structural Profile",
        Step::Univariate => "Univariate Analysis",
        Step::Bivariate => "Bivariate Analysis",
        Step::Multivariate => "Multivariate Binning",
        Step::MissingValues => "Missing Values",
        Step::Outliers => "Outlier Treatment",
        Step::FeatureEngineering => "Feature Engineering",
        Step::FeatureRanking => "Feature Ranking",
    }
}

/// Load `input`, check the required columns, and run every step.
pub fn run_pipeline(
    input: &Path,
    sheet: Option<&str>,
    config: &EdaConfig,
    sink: &mut dyn PlotSink,
    options: RunOptions,
) -> Result<RunOutcome> {
    let start = Instant::now();
    if options.show_progress {
        print_step_header(1, title(Step::Load));
    }
    let spinner = spinner(options, "Loading dataset...");
    let loaded = load_dataset(input, sheet)
        .and_then(|df| require_columns(&df, Step::Load, &columns::REQUIRED).map(|_| df));
    let df = match loaded {
        Ok(df) => {
            finish_with_success(&spinner, "Dataset loaded");
            df
        }
        Err(err) => {
            finish_with_warning(&spinner, "Loading failed");
            return Err(err);
        }
    };

    let mut runner = Runner::new(config, sink, options, Some(input.display().to_string()), &df);
    runner.summary.record(Step::Load, start.elapsed(), Vec::new());
    runner.run(df)
}

/// Run every step after loading on an in-memory table.
pub fn run_on_frame(
    df: DataFrame,
    config: &EdaConfig,
    sink: &mut dyn PlotSink,
    options: RunOptions,
) -> Result<RunOutcome> {
    require_columns(&df, Step::Load, &columns::REQUIRED)?;
    Runner::new(config, sink, options, None, &df).run(df)
}

fn spinner(options: RunOptions, message: &str) -> ProgressBar {
    if options.show_progress {
        create_spinner(message)
    } else {
        hidden_spinner()
    }
}

struct Runner<'a> {
    config: &'a EdaConfig,
    sink: &'a mut dyn PlotSink,
    options: RunOptions,
    summary: RunSummary,
}

impl<'a> Runner<'a> {
    fn new(
        config: &'a EdaConfig,
        sink: &'a mut dyn PlotSink,
        options: RunOptions,
        input: Option<String>,
        df: &DataFrame,
    ) -> Self {
        Self {
            config,
            sink,
            options,
            summary: RunSummary::new(input, df.height(), df.width()),
        }
    }

    fn begin(&mut self, step: Step) -> Instant {
        if self.options.show_progress {
            print_step_header(self.summary.next_number(), title(step));
        }
        Instant::now()
    }

    fn finish(&mut self, step: Step, started: Instant, failures: Vec<StepFailure>) {
        let elapsed = started.elapsed();
        info!(step = %step, elapsed_ms = elapsed.as_millis() as u64, failures = failures.len(), "step finished");
        if self.options.show_progress && failures.is_empty() {
            print_success(&format!("{} complete", title(step)));
        }
        self.summary.record(step, elapsed, failures);
    }

    /// Record a report-step failure and carry on.
    fn isolate<T>(&self, result: Result<T>, failures: &mut Vec<StepFailure>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.note_failure(&err, failures);
                None
            }
        }
    }

    fn note_failure(&self, err: &EdaError, failures: &mut Vec<StepFailure>) {
        warn!(step = %err.step(), columns = ?err.columns(), error = %err, "step failed; continuing");
        if self.options.show_progress {
            print_warning(&err.to_string());
        }
        failures.push(StepFailure::from(err));
    }

    fn plot(&mut self, plot: Plot<'_>) {
        if let Err(e) = self.sink.render(plot) {
            warn!(plot = %plot.title(), error = %e, "plot rendering failed");
        }
    }

    fn table(&self, heading: &str, table: Table) {
        if self.options.show_progress {
            print_section(heading);
            print_table(&table);
        }
    }

    fn run(mut self, mut df: DataFrame) -> Result<RunOutcome> {
        let profile = self.profile(&df);
        let (numeric, categorical) = self.univariate(&df);
        let bivariate = self.bivariate(&df);
        let joint_attrition = self.multivariate(&mut df)?;
        let missing_ratios = self.missing(&mut df)?;
        let caps = self.outliers(&mut df)?;
        self.features(&mut df)?;
        let ranking = self.ranking(&df);

        self.summary.final_columns = df.width();
        Ok(RunOutcome {
            data: df,
            summary: self.summary,
            profile,
            numeric,
            categorical,
            bivariate,
            joint_attrition,
            missing_ratios,
            caps,
            ranking,
        })
    }

    fn profile(&mut self, df: &DataFrame) -> Option<DatasetProfile> {
        let started = self.begin(Step::Profile);
        let mut failures = Vec::new();
        let profile = self.isolate(profile_dataset(df, self.config.sample_rows), &mut failures);

        if let Some(p) = &profile {
            if self.options.show_progress {
                print_info(&format!(
                    "{} rows × {} columns, ~{:.2} MB in memory",
                    p.rows,
                    p.columns.len(),
                    p.memory_mb
                ));
            }
            self.table("Schema", tables::schema_table(p));
            self.table("Sample rows", tables::sample_table(&p.sample));
            self.table("Numeric summary", tables::describe_table(&p.numeric));
        }
        self.finish(Step::Profile, started, failures);
        profile
    }

    fn univariate(&mut self, df: &DataFrame) -> (Vec<NumericUnivariate>, Vec<CategoricalUnivariate>) {
        let started = self.begin(Step::Univariate);
        let mut failures = Vec::new();
        let config = self.config;

        let mut numeric = Vec::new();
        for column in &config.numeric_columns {
            let result = analyze_numeric(df, column, config.normality_cap, config.histogram_bins);
            if let Some(analysis) = self.isolate(result, &mut failures) {
                if let Some(err) = analysis.normality_error() {
                    self.note_failure(&err, &mut failures);
                }
                self.plot(Plot::Distribution(&analysis.histogram));
                let heading = format!("Boxplot of {}", column);
                self.plot(Plot::BoxPlots {
                    title: &heading,
                    boxes: std::slice::from_ref(&analysis.boxplot),
                });
                numeric.push(analysis);
            }
        }
        if !numeric.is_empty() {
            self.table("Distribution shape and normality", tables::shape_table(&numeric));
        }

        let mut categorical = Vec::new();
        for column in &config.categorical_columns {
            if let Some(counts) = self.isolate(analyze_categorical(df, column), &mut failures) {
                self.table(&format!("Value counts of {}", column), tables::value_counts_table(&counts));
                self.plot(Plot::Counts(&counts));
                categorical.push(counts);
            }
        }

        self.finish(Step::Univariate, started, failures);
        (numeric, categorical)
    }

    fn bivariate(&mut self, df: &DataFrame) -> BivariateReport {
        let started = self.begin(Step::Bivariate);
        let mut failures = Vec::new();
        let report = analyze_bivariate(df, self.config);
        for err in &report.failures {
            self.note_failure(err, &mut failures);
        }

        if let Some(means) = &report.department_means {
            self.table("Means by Department", tables::group_means_table(means));
        }
        if let Some(tab) = &report.gender_attrition {
            self.table("Resignation rate by Gender", tables::crosstab_table(tab));
            self.plot(Plot::StackedBars {
                title: "Resigned by Gender",
                table: tab,
            });
        }
        if let Some(matrix) = &report.correlation {
            self.table("Pearson correlation", tables::correlation_table(matrix));
            self.plot(Plot::Heatmap(matrix));
        }
        if let Some(boxes) = &report.salary_by_department {
            self.plot(Plot::BoxPlots {
                title: "Salary by Department",
                boxes,
            });
        }
        if let Some(boxes) = &report.engagement_by_outcome {
            self.plot(Plot::BoxPlots {
                title: "Engagement_Score by Resigned",
                boxes,
            });
        }
        self.table("Hypothesis tests", tables::tests_table(&report));

        self.finish(Step::Bivariate, started, failures);
        report
    }

    fn multivariate(&mut self, df: &mut DataFrame) -> Result<Option<CrossTab>> {
        let started = self.begin(Step::Multivariate);
        let mut failures = Vec::new();
        derive_bands(df)?;

        let joint = self.isolate(joint_crosstab(df), &mut failures);
        if let Some(tab) = &joint {
            self.table("Resignation rate by tenure and engagement", tables::crosstab_table(tab));
            self.plot(Plot::StackedBars {
                title: "Resigned by Tenure_Group and Engagement_Level",
                table: tab,
            });
        }
        self.finish(Step::Multivariate, started, failures);
        Ok(joint)
    }

    fn missing(&mut self, df: &mut DataFrame) -> Result<Vec<(String, f64)>> {
        let started = self.begin(Step::MissingValues);
        let ratios = analyze_missing_values(df);
        self.table("Missing values per column", tables::missing_table(&ratios));
        let matrix = missing_matrix(df);
        self.plot(Plot::Missingness(&matrix));

        handle_missing(df)?;
        self.finish(Step::MissingValues, started, Vec::new());
        Ok(ratios)
    }

    fn outliers(&mut self, df: &mut DataFrame) -> Result<Vec<(String, QuantileCaps)>> {
        let started = self.begin(Step::Outliers);
        let caps = treat_outliers(df, self.config.lower_percentile, self.config.upper_percentile)?;
        self.table("Percentile caps", tables::caps_table(&caps));
        self.finish(Step::Outliers, started, Vec::new());
        Ok(caps)
    }

    fn features(&mut self, df: &mut DataFrame) -> Result<()> {
        let started = self.begin(Step::FeatureEngineering);
        engineer_features(df, &self.config.risk)?;
        if self.options.show_progress {
            print_info(&format!(
                "Added {}, {}, {}",
                columns::SALARY_LOG,
                columns::SALARY_PER_MONTH,
                columns::AT_RISK
            ));
        }
        self.finish(Step::FeatureEngineering, started, Vec::new());
        Ok(())
    }

    fn ranking(&mut self, df: &DataFrame) -> Option<FeatureRanking> {
        let started = self.begin(Step::FeatureRanking);
        let mut failures = Vec::new();
        let config = self.config;

        let spinner = spinner(self.options, "Scoring features (mutual information + IV)...");
        let result = rank_features(
            df,
            &config.ranking_features,
            columns::RESIGNED,
            &TargetMapping::new(config.event_label.as_str(), config.non_event_label.as_str()),
            &MiConfig {
                n_neighbors: config.mi_neighbors,
                seed: config.seed,
            },
            &config.binning,
        );
        match &result {
            Ok(_) => finish_with_success(&spinner, "Features scored"),
            Err(_) => finish_with_warning(&spinner, "Feature scoring failed"),
        }

        let ranking = self.isolate(result, &mut failures);
        if let Some(r) = &ranking {
            self.table("Feature ranking against Resigned", tables::ranking_table(r));
            for analysis in &r.iv_details {
                self.table(&format!("WoE bins of {}", analysis.feature_name), tables::woe_table(analysis));
            }
        }
        self.finish(Step::FeatureRanking, started, failures);
        ranking
    }
}
