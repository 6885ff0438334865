//! Optimal merging of pre-bins
//!
//! Finds the partition of consecutive pre-bins that maximizes total
//! Information Value, optionally under a bin-count cap and a monotonic WoE
//! trend. With at most a few dozen pre-bins the search is solved exactly by
//! dynamic programming over (last segment, bin count).

mod dp;
mod monotonicity;
mod segments;

use serde::Serialize;

use super::iv::WoeBin;

pub use monotonicity::MonotonicityConstraint;
pub use segments::{Segment, SegmentTable};

/// Configuration for the optimal merge
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SolverConfig {
    /// Monotonicity constraint for the WoE pattern
    pub monotonicity: MonotonicityConstraint,
    /// Upper bound on the number of final bins (None = unbounded)
    pub max_bins: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            monotonicity: MonotonicityConstraint::Auto,
            max_bins: None,
        }
    }
}

/// Result of the optimal merge
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Each (start, end) pair names the inclusive prebin range merged into
    /// one final bin, in ascending order
    pub bin_boundaries: Vec<(usize, usize)>,
    /// Total IV achieved by this solution (excluding any missing bin)
    pub total_iv: f64,
    /// The monotonicity constraint that was applied (never `Auto`)
    pub monotonicity_applied: MonotonicityConstraint,
}

/// Merge `prebins` into the IV-maximizing partition.
///
/// An empty prebin list yields an empty solution.
pub fn solve_optimal_binning(
    prebins: &[WoeBin],
    config: &SolverConfig,
    total_events: f64,
    total_non_events: f64,
) -> SolverResult {
    if prebins.is_empty() {
        return SolverResult {
            bin_boundaries: Vec::new(),
            total_iv: 0.0,
            monotonicity_applied: MonotonicityConstraint::None,
        };
    }

    let table = SegmentTable::new(prebins, total_events, total_non_events);

    match config.monotonicity {
        MonotonicityConstraint::Auto => {
            let ascending = dp::solve(&table, MonotonicityConstraint::Ascending, config.max_bins);
            let descending =
                dp::solve(&table, MonotonicityConstraint::Descending, config.max_bins);
            if descending.total_iv > ascending.total_iv + 1e-12 {
                descending
            } else {
                ascending
            }
        }
        constraint => dp::solve(&table, constraint, config.max_bins),
    }
}

/// Reconstruct final WoeBin vector from solver result
///
/// Takes the original prebins and the solver's bin boundary decisions,
/// merging prebins as specified to produce the final bins.
pub fn reconstruct_bins_from_solution(
    prebins: &[WoeBin],
    result: &SolverResult,
    total_events: f64,
    total_non_events: f64,
    total_samples: f64,
) -> Vec<WoeBin> {
    let table = SegmentTable::new(prebins, total_events, total_non_events);

    result
        .bin_boundaries
        .iter()
        .map(|&(start, end)| {
            let merged = table.segment(start, end);
            WoeBin {
                lower_bound: prebins[start].lower_bound,
                upper_bound: prebins[end].upper_bound,
                events: merged.events,
                non_events: merged.non_events,
                woe: merged.woe,
                iv_contribution: merged.iv,
                count: merged.count,
                population_pct: if total_samples > 0.0 {
                    merged.count / total_samples * 100.0
                } else {
                    0.0
                },
                event_rate: if merged.count > 0.0 {
                    merged.events / merged.count
                } else {
                    0.0
                },
            }
        })
        .collect()
}
