//! Pipeline module - the analysis steps and their statistics

pub mod binning;
pub mod bivariate;
pub mod config;
pub mod correlation;
pub mod crosstab;
pub mod error;
pub mod features;
pub mod frame;
pub mod hypothesis;
pub mod iv;
pub mod loader;
pub mod missing;
pub mod mutual_info;
pub mod normality;
pub mod outliers;
pub mod profile;
pub mod ranking;
pub mod runner;
pub mod solver;
pub mod stats;
pub mod target;
pub mod univariate;

pub use config::{columns, EdaConfig, RiskThresholds};
pub use error::{EdaError, Result, Step};
pub use iv::{analyze_feature_iv, BinningConfig, IvAnalysis, IvStrength};
pub use loader::load_dataset;
pub use mutual_info::{mutual_info_classif, MiConfig};
pub use ranking::{rank_features, FeatureRanking, FeatureScore};
pub use runner::{run_on_frame, run_pipeline, RunOptions, RunOutcome};
pub use solver::MonotonicityConstraint;
pub use target::TargetMapping;
