//! Information Value (IV) and Weight of Evidence (WoE) via optimal binning
//!
//! A numeric feature is pre-binned with CART-style splits, then the
//! pre-bins are merged by the solver into the IV-maximizing partition with a
//! monotonic WoE trend. Null feature values get a dedicated MISSING bin.

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::error::{EdaError, Result, Step};
use super::frame::float_values;
use super::solver::{
    reconstruct_bins_from_solution, solve_optimal_binning, MonotonicityConstraint, SolverConfig,
};

/// Minimum records with a valid target before a feature is binned at all
const MIN_VALID_RECORDS: usize = 5;

/// Smoothing constant to avoid log(0) in WoE calculation (Laplace smoothing)
const SMOOTHING: f64 = 0.5;

/// Optimal binning parameters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BinningConfig {
    /// Upper bound on CART pre-bins
    pub max_prebins: usize,
    /// Minimum share of non-missing records in each pre-bin
    pub min_prebin_fraction: f64,
    /// Upper bound on final bins (None = as many as the trend allows)
    pub max_bins: Option<usize>,
    pub monotonicity: MonotonicityConstraint,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            max_prebins: 20,
            min_prebin_fraction: 0.05,
            max_bins: None,
            monotonicity: MonotonicityConstraint::Auto,
        }
    }
}

/// Conventional reading of an IV value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IvStrength {
    Useless,
    Weak,
    Medium,
    Strong,
    /// Too good to be true; usually leakage
    Suspicious,
}

impl IvStrength {
    pub fn from_iv(iv: f64) -> Self {
        if iv < 0.02 {
            IvStrength::Useless
        } else if iv < 0.1 {
            IvStrength::Weak
        } else if iv < 0.3 {
            IvStrength::Medium
        } else if iv < 0.5 {
            IvStrength::Strong
        } else {
            IvStrength::Suspicious
        }
    }
}

impl std::fmt::Display for IvStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IvStrength::Useless => "useless",
            IvStrength::Weak => "weak",
            IvStrength::Medium => "medium",
            IvStrength::Strong => "strong",
            IvStrength::Suspicious => "suspicious",
        };
        write!(f, "{}", label)
    }
}

/// A single bin with WoE statistics
#[derive(Debug, Clone, Serialize)]
pub struct WoeBin {
    /// Lower bound (inclusive)
    pub lower_bound: f64,
    /// Upper bound (exclusive, except for last bin)
    pub upper_bound: f64,
    /// Count of events (target = 1) in this bin
    pub events: f64,
    /// Count of non-events (target = 0) in this bin
    pub non_events: f64,
    /// Weight of Evidence for this bin
    pub woe: f64,
    /// Contribution to total IV from this bin
    pub iv_contribution: f64,
    pub count: f64,
    /// Percentage of total population in this bin
    pub population_pct: f64,
    /// Event rate (events / count)
    pub event_rate: f64,
}

/// A bin for missing/null values with WoE statistics
#[derive(Debug, Clone, Serialize)]
pub struct MissingBin {
    pub events: f64,
    pub non_events: f64,
    pub woe: f64,
    pub iv_contribution: f64,
    pub count: f64,
    pub population_pct: f64,
    pub event_rate: f64,
}

/// Complete IV analysis results for a single feature
#[derive(Debug, Clone, Serialize)]
pub struct IvAnalysis {
    pub feature_name: String,
    /// Final bins in ascending value order
    pub bins: Vec<WoeBin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_bin: Option<MissingBin>,
    /// Total Information Value (bins + missing bin)
    pub iv: f64,
    /// Gini coefficient calculated on WoE-encoded values
    pub gini: f64,
    pub strength: IvStrength,
    /// WoE trend the final bins follow
    pub monotonicity: MonotonicityConstraint,
    /// Records with a valid target that entered the analysis
    pub records: usize,
}

/// Event / non-event totals across every record with a valid target
struct Totals {
    events: f64,
    non_events: f64,
    samples: f64,
}

/// `2p(1 - p)` weighted by the node size
fn weighted_impurity(events: f64, count: f64) -> f64 {
    if count <= 0.0 {
        return 0.0;
    }
    let p = events / count;
    2.0 * p * (1.0 - p) * count
}

/// Best CART cut of `pairs` (sorted by value): the index of the first
/// record on the right side. Cuts never separate equal values and leave at
/// least `min_samples` records on each side.
fn best_cut(pairs: &[(f64, i32)], min_samples: usize) -> Option<usize> {
    let n = pairs.len();
    if n < 2 * min_samples.max(1) {
        return None;
    }

    let events = pairs.iter().filter(|(_, t)| *t == 1).count() as f64;
    let parent = weighted_impurity(events, n as f64);

    let mut best: Option<(usize, f64)> = None;
    let mut left_events = 0.0;
    for cut in 1..n {
        left_events += pairs[cut - 1].1 as f64;
        if cut < min_samples || n - cut < min_samples {
            continue;
        }
        if (pairs[cut].0 - pairs[cut - 1].0).abs() < 1e-10 {
            continue;
        }
        let children = weighted_impurity(left_events, cut as f64)
            + weighted_impurity(events - left_events, (n - cut) as f64);
        let gain = parent - children;
        if gain > 1e-12 && best.map_or(true, |(_, g)| gain > g) {
            best = Some((cut, gain));
        }
    }
    best.map(|(cut, _)| cut)
}

/// Cut positions (absolute indices into the full slice) of a CART tree
/// with at most `budget` cuts, split evenly between subtrees.
fn cart_cuts(pairs: &[(f64, i32)], offset: usize, budget: usize, min_samples: usize) -> Vec<usize> {
    if budget == 0 {
        return Vec::new();
    }
    let Some(cut) = best_cut(pairs, min_samples) else {
        return Vec::new();
    };

    let rest = budget - 1;
    let (left, right) = pairs.split_at(cut);
    let mut cuts = cart_cuts(left, offset, rest / 2, min_samples);
    cuts.push(offset + cut);
    cuts.extend(cart_cuts(right, offset + cut, rest - rest / 2, min_samples));
    cuts
}

/// Prebins delimited by CART cuts; the last prebin is open above.
fn cart_prebins(pairs: &[(f64, i32)], max_prebins: usize, min_samples: usize, totals: &Totals) -> Vec<WoeBin> {
    if pairs.is_empty() {
        return Vec::new();
    }

    let mut edges = cart_cuts(pairs, 0, max_prebins.saturating_sub(1), min_samples);
    edges.push(pairs.len());

    let mut start = 0;
    edges
        .into_iter()
        .map(|end| {
            let upper = pairs.get(end).map_or(f64::INFINITY, |(v, _)| *v);
            let bin = woe_bin(&pairs[start..end], upper, totals);
            start = end;
            bin
        })
        .collect()
}

fn woe_bin(members: &[(f64, i32)], upper: f64, totals: &Totals) -> WoeBin {
    let lower = members.first().map_or(f64::NEG_INFINITY, |(v, _)| *v);
    let count = members.len() as f64;
    let events = members.iter().filter(|(_, t)| *t == 1).count() as f64;
    let non_events = count - events;
    let (woe, iv_contribution) = calculate_woe_iv(events, non_events, totals.events, totals.non_events);

    WoeBin {
        lower_bound: lower,
        upper_bound: upper,
        events,
        non_events,
        woe,
        iv_contribution,
        count,
        population_pct: count / totals.samples * 100.0,
        event_rate: if count > 0.0 { events / count } else { 0.0 },
    }
}

// ============================================================================
// Main Analysis
// ============================================================================

/// Bin one numeric feature against a 0/1 target mask and compute its IV.
///
/// Rows whose target is `None` are skipped entirely; rows with a null (or
/// NaN) feature value go to the MISSING bin.
pub fn analyze_feature_iv(
    df: &DataFrame,
    feature: &str,
    target: &[Option<i32>],
    config: &BinningConfig,
) -> Result<IvAnalysis> {
    let values = float_values(df, Step::FeatureRanking, feature)?;

    let mut pairs: Vec<(f64, i32)> = Vec::new();
    let mut missing_events = 0.0f64;
    let mut missing_non_events = 0.0f64;

    for (v, t) in values.iter().zip(target.iter()) {
        let Some(t) = *t else { continue };
        match v {
            Some(x) if !x.is_nan() => pairs.push((*x, t)),
            _ => {
                if t == 1 {
                    missing_events += 1.0;
                } else {
                    missing_non_events += 1.0;
                }
            }
        }
    }

    let missing_count = missing_events + missing_non_events;
    let records = pairs.len() + missing_count as usize;
    if records < MIN_VALID_RECORDS {
        return Err(EdaError::precondition(
            Step::FeatureRanking,
            "information value",
            &[feature],
            format!("needs at least {} records with a valid target, got {}", MIN_VALID_RECORDS, records),
        ));
    }

    let pair_events = pairs.iter().filter(|(_, t)| *t == 1).count() as f64;
    let totals = Totals {
        events: pair_events + missing_events,
        non_events: (pairs.len() as f64 - pair_events) + missing_non_events,
        samples: records as f64,
    };

    if totals.events <= 0.0 || totals.non_events <= 0.0 {
        return Err(EdaError::precondition(
            Step::FeatureRanking,
            "information value",
            &[feature],
            "target has no variation (all 0s or all 1s)",
        ));
    }

    let missing_bin = if missing_count > 0.0 {
        let (woe, iv_contribution) =
            calculate_woe_iv(missing_events, missing_non_events, totals.events, totals.non_events);
        Some(MissingBin {
            events: missing_events,
            non_events: missing_non_events,
            woe,
            iv_contribution,
            count: missing_count,
            population_pct: missing_count / totals.samples * 100.0,
            event_rate: missing_events / missing_count,
        })
    } else {
        None
    };

    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let min_prebin_samples = ((pairs.len() as f64 * config.min_prebin_fraction).ceil() as usize).max(1);
    let prebins = cart_prebins(&pairs, config.max_prebins, min_prebin_samples, &totals);

    let solver_config = SolverConfig {
        monotonicity: config.monotonicity,
        max_bins: config.max_bins,
    };
    let solution = solve_optimal_binning(&prebins, &solver_config, totals.events, totals.non_events);
    let bins = reconstruct_bins_from_solution(
        &prebins,
        &solution,
        totals.events,
        totals.non_events,
        totals.samples,
    );

    debug!(
        feature,
        prebins = prebins.len(),
        bins = bins.len(),
        trend = %solution.monotonicity_applied,
        "optimal binning finished"
    );

    let bins_iv: f64 = bins.iter().map(|b| b.iv_contribution).sum();
    let missing_iv = missing_bin.as_ref().map(|b| b.iv_contribution).unwrap_or(0.0);
    let iv = (bins_iv + missing_iv).max(0.0);

    let gini = woe_gini(&bins, missing_bin.as_ref());

    Ok(IvAnalysis {
        feature_name: feature.to_string(),
        bins,
        missing_bin,
        iv,
        gini,
        strength: IvStrength::from_iv(iv),
        monotonicity: solution.monotonicity_applied,
        records,
    })
}

/// Calculate WoE and IV contribution for a bin
///
/// Uses ln(%events / %non-events): WoE > 0 means the bin resigns more than
/// average. The IV contribution `(%ev - %nev) * WoE` is never negative.
pub(crate) fn calculate_woe_iv(
    events: f64,
    non_events: f64,
    total_events: f64,
    total_non_events: f64,
) -> (f64, f64) {
    let dist_events = (events + SMOOTHING) / (total_events + SMOOTHING);
    let dist_non_events = (non_events + SMOOTHING) / (total_non_events + SMOOTHING);

    let woe = (dist_events / dist_non_events).ln();
    let iv_contrib = (dist_events - dist_non_events) * woe;

    (woe, iv_contrib)
}

/// Gini (2 * AUC - 1) of the feature encoded by its WoE.
///
/// Every record in a bin shares that bin's WoE, so the rank statistic is
/// computed per bin: each event outranks the non-events of lower-WoE bins
/// and ties half of those sharing its WoE.
fn woe_gini(bins: &[WoeBin], missing_bin: Option<&MissingBin>) -> f64 {
    let mut groups: Vec<(f64, f64, f64)> = bins.iter().map(|b| (b.woe, b.events, b.non_events)).collect();
    if let Some(mb) = missing_bin {
        groups.push((mb.woe, mb.events, mb.non_events));
    }
    groups.sort_by(|a, b| a.0.total_cmp(&b.0));

    let events: f64 = groups.iter().map(|g| g.1).sum();
    let non_events: f64 = groups.iter().map(|g| g.2).sum();
    if events <= 0.0 || non_events <= 0.0 {
        return 0.0;
    }

    let mut concordant = 0.0;
    let mut non_events_below = 0.0;
    let mut i = 0;
    while i < groups.len() {
        let mut j = i;
        let (mut tie_events, mut tie_non_events) = (0.0, 0.0);
        while j < groups.len() && (groups[j].0 - groups[i].0).abs() < 1e-10 {
            tie_events += groups[j].1;
            tie_non_events += groups[j].2;
            j += 1;
        }
        concordant += tie_events * (non_events_below + tie_non_events / 2.0);
        non_events_below += tie_non_events;
        i = j;
    }

    let auc = (concordant / (events * non_events)).clamp(0.0, 1.0);
    2.0 * auc - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(values: Vec<Option<f64>>) -> DataFrame {
        df! { "x" => values }.unwrap()
    }

    #[test]
    fn test_woe_iv_sign_convention() {
        let (woe, iv) = calculate_woe_iv(30.0, 10.0, 50.0, 50.0);
        assert!(woe > 0.0);
        assert!(iv > 0.0);

        let (woe, iv) = calculate_woe_iv(10.0, 30.0, 50.0, 50.0);
        assert!(woe < 0.0);
        assert!(iv > 0.0);
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(IvStrength::from_iv(0.0), IvStrength::Useless);
        assert_eq!(IvStrength::from_iv(0.02), IvStrength::Weak);
        assert_eq!(IvStrength::from_iv(0.1), IvStrength::Medium);
        assert_eq!(IvStrength::from_iv(0.3), IvStrength::Strong);
        assert_eq!(IvStrength::from_iv(0.5), IvStrength::Suspicious);
    }

    #[test]
    fn test_best_cut_separable() {
        let pairs: Vec<(f64, i32)> = (0..20).map(|i| (i as f64, if i < 10 { 0 } else { 1 })).collect();
        assert_eq!(best_cut(&pairs, 2), Some(10));
        assert_eq!(cart_cuts(&pairs, 0, 5, 2), vec![10]);
    }

    #[test]
    fn test_best_cut_respects_ties() {
        let pairs = vec![(1.0, 0), (1.0, 0), (1.0, 1), (1.0, 1)];
        assert!(best_cut(&pairs, 1).is_none());
    }

    #[test]
    fn test_min_samples_limits_cuts() {
        let pairs: Vec<(f64, i32)> = (0..10).map(|i| (i as f64, (i == 0) as i32)).collect();
        assert_eq!(best_cut(&pairs, 3), Some(3));
        assert!(best_cut(&pairs, 6).is_none());
    }

    #[test]
    fn test_separating_feature_is_suspicious() {
        let values: Vec<Option<f64>> = (0..100).map(|i| Some(i as f64)).collect();
        let target: Vec<Option<i32>> = (0..100).map(|i| Some(if i >= 50 { 1 } else { 0 })).collect();

        let analysis =
            analyze_feature_iv(&frame(values), "x", &target, &BinningConfig::default()).unwrap();
        assert!(analysis.iv > 0.5, "iv = {}", analysis.iv);
        assert_eq!(analysis.strength, IvStrength::Suspicious);
        assert!((analysis.gini - 1.0).abs() < 1e-9);
        assert_eq!(analysis.monotonicity, MonotonicityConstraint::Ascending);
    }

    #[test]
    fn test_bins_follow_monotonic_woe() {
        // Event rate rises with x but with a local dip.
        let values: Vec<Option<f64>> = (0..200).map(|i| Some(i as f64)).collect();
        let target: Vec<Option<i32>> = (0..200)
            .map(|i| {
                let event = match i {
                    0..=49 => i % 10 == 0,
                    50..=99 => i % 3 == 0,
                    100..=149 => i % 5 == 0,
                    _ => i % 10 != 0,
                };
                Some(event as i32)
            })
            .collect();

        let analysis =
            analyze_feature_iv(&frame(values), "x", &target, &BinningConfig::default()).unwrap();
        let woes: Vec<f64> = analysis.bins.iter().map(|b| b.woe).collect();
        let ascending = woes.windows(2).all(|w| w[0] < w[1]);
        let descending = woes.windows(2).all(|w| w[0] > w[1]);
        assert!(ascending || descending, "woes = {:?}", woes);
        assert!(analysis.iv >= 0.0);
    }

    #[test]
    fn test_missing_values_get_their_own_bin() {
        let mut values: Vec<Option<f64>> = (0..40).map(|i| Some(i as f64)).collect();
        let mut target: Vec<Option<i32>> = (0..40).map(|i| Some((i % 2) as i32)).collect();
        values.extend(vec![None; 10]);
        target.extend(vec![Some(1); 10]);

        let analysis =
            analyze_feature_iv(&frame(values), "x", &target, &BinningConfig::default()).unwrap();
        let missing = analysis.missing_bin.unwrap();
        assert_eq!(missing.count, 10.0);
        assert_eq!(missing.events, 10.0);
        assert!(missing.woe > 0.0);
        assert_eq!(analysis.records, 50);
    }

    #[test]
    fn test_unmapped_target_rows_are_skipped() {
        let values: Vec<Option<f64>> = (0..12).map(|i| Some(i as f64)).collect();
        let target = vec![
            Some(0), Some(1), None, Some(0), Some(1), None,
            Some(0), Some(1), None, Some(0), Some(1), None,
        ];
        let analysis =
            analyze_feature_iv(&frame(values), "x", &target, &BinningConfig::default()).unwrap();
        assert_eq!(analysis.records, 8);
    }

    #[test]
    fn test_constant_target_is_precondition_error() {
        let values: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let target = vec![Some(0); 10];
        let err = analyze_feature_iv(&frame(values), "x", &target, &BinningConfig::default())
            .unwrap_err();
        assert!(matches!(err, EdaError::StatisticalPrecondition { .. }));
        assert_eq!(err.columns(), vec!["x"]);
    }

    #[test]
    fn test_woe_gini_perfect_and_uninformative() {
        let bin = |woe: f64, events: f64, non_events: f64| WoeBin {
            lower_bound: 0.0,
            upper_bound: 1.0,
            events,
            non_events,
            woe,
            iv_contribution: 0.0,
            count: events + non_events,
            population_pct: 0.0,
            event_rate: 0.0,
        };
        let separated = [bin(-2.0, 0.0, 10.0), bin(2.0, 10.0, 0.0)];
        assert!((woe_gini(&separated, None) - 1.0).abs() < 1e-12);

        let flat = [bin(0.0, 5.0, 5.0)];
        assert!(woe_gini(&flat, None).abs() < 1e-12);
    }
}
