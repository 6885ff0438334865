//! Feature ranking against the resignation outcome

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::error::{Result, Step};
use super::frame::{float_values, require_columns};
use super::iv::{analyze_feature_iv, BinningConfig, IvAnalysis, IvStrength};
use super::mutual_info::{mutual_info_classif, MiConfig};
use super::target::{binary_target, TargetCounts, TargetMapping};

/// Scores of one feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureScore {
    pub feature: String,
    pub mutual_information: f64,
    pub iv: f64,
    pub iv_strength: IvStrength,
    pub gini: f64,
    pub bins: usize,
}

/// Ranking of all configured features, strongest IV first
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRanking {
    pub target: String,
    pub mapping: TargetMapping,
    pub counts: TargetCounts,
    pub seed: u64,
    pub scores: Vec<FeatureScore>,
    /// Full binning detail per feature, same order as `scores`
    pub iv_details: Vec<IvAnalysis>,
}

impl FeatureRanking {
    pub fn score(&self, feature: &str) -> Option<&FeatureScore> {
        self.scores.iter().find(|s| s.feature == feature)
    }
}

/// Mutual information and Information Value of each feature against the
/// mapped outcome. Rows whose outcome matches neither label are excluded.
pub fn rank_features(
    df: &DataFrame,
    features: &[String],
    target: &str,
    mapping: &TargetMapping,
    mi_config: &MiConfig,
    binning: &BinningConfig,
) -> Result<FeatureRanking> {
    let step = Step::FeatureRanking;
    let mut required: Vec<&str> = features.iter().map(|f| f.as_str()).collect();
    required.push(target);
    require_columns(df, step, &required)?;

    let (mask, counts) = binary_target(df, step, target, mapping)?;
    let valid_rows: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.map(|_| i))
        .collect();
    let labels: Vec<i32> = mask.iter().flatten().copied().collect();
    debug!(
        events = counts.events,
        non_events = counts.non_events,
        ignored = counts.ignored,
        "outcome mapped"
    );

    let columns: Vec<Vec<Option<f64>>> = features
        .iter()
        .map(|f| -> Result<Vec<Option<f64>>> {
            let values = float_values(df, step, f)?;
            Ok(valid_rows.iter().map(|&i| values[i]).collect())
        })
        .collect::<Result<_>>()?;

    let mi_scores = mutual_info_classif(&columns, &labels, mi_config);

    let mut ranked: Vec<(FeatureScore, IvAnalysis)> = Vec::with_capacity(features.len());
    for (feature, mi) in features.iter().zip(mi_scores) {
        let analysis = analyze_feature_iv(df, feature, &mask, binning)?;
        let score = FeatureScore {
            feature: feature.clone(),
            mutual_information: mi,
            iv: analysis.iv,
            iv_strength: analysis.strength,
            gini: analysis.gini,
            bins: analysis.bins.len() + analysis.missing_bin.is_some() as usize,
        };
        ranked.push((score, analysis));
    }

    ranked.sort_by(|(a, _), (b, _)| {
        b.iv.partial_cmp(&a.iv)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.mutual_information
                    .partial_cmp(&a.mutual_information)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.feature.cmp(&b.feature))
    });

    let (scores, iv_details) = ranked.into_iter().unzip();

    Ok(FeatureRanking {
        target: target.to_string(),
        mapping: mapping.clone(),
        counts,
        seed: mi_config.seed,
        scores,
        iv_details,
    })
}
