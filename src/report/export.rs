//! Machine-readable ranking output

use anyhow::{Context, Result};
use serde::Serialize;

use crate::pipeline::config::EdaConfig;
use crate::pipeline::iv::BinningConfig;
use crate::pipeline::ranking::FeatureRanking;

use super::summary::RunSummary;

/// Settings that determine the ranking result
#[derive(Serialize)]
pub struct RankingMetadata {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    pub seed: u64,
    pub mi_neighbors: usize,
    pub binning: BinningConfig,
}

/// Ranking plus the run summary, printed with `--json`
#[derive(Serialize)]
pub struct RankingExport<'a> {
    pub metadata: RankingMetadata,
    pub summary: &'a RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<&'a FeatureRanking>,
}

impl<'a> RankingExport<'a> {
    pub fn new(config: &EdaConfig, summary: &'a RunSummary, ranking: Option<&'a FeatureRanking>) -> Self {
        Self {
            metadata: RankingMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: summary.input.clone(),
                seed: config.seed,
                mi_neighbors: config.mi_neighbors,
                binning: config.binning,
            },
            summary,
            ranking,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize feature ranking")
    }
}
