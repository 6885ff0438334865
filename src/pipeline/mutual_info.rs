//! Mutual information between a continuous feature and a discrete target
//!
//! Nearest-neighbour estimator (Ross, 2014). For every point the distance to
//! its k-th neighbour within the same class fixes a radius; the number of
//! points of any class inside that radius feeds a digamma combination:
//!
//! `MI = psi(N) + <psi(k)> - <psi(N_class)> - <psi(m)>`
//!
//! Features are one-dimensional here, so neighbour searches run on sorted
//! arrays instead of a spatial tree.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;
use statrs::function::gamma::digamma;

use super::stats::{mean, std_dev};

/// Estimator parameters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MiConfig {
    /// Neighbours per point (capped by class size - 1)
    pub n_neighbors: usize,
    /// Seed of the tie-breaking jitter
    pub seed: u64,
}

impl Default for MiConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 3,
            seed: 42,
        }
    }
}

/// Largest float strictly closer to zero, so the k-th neighbour itself
/// falls outside the radius.
fn next_toward_zero(d: f64) -> f64 {
    if d > 0.0 && d.is_finite() {
        f64::from_bits(d.to_bits() - 1)
    } else {
        d
    }
}

/// Distance from `sorted[p]` to its k-th nearest neighbour (self excluded).
fn kth_neighbour_distance(sorted: &[f64], p: usize, k: usize) -> f64 {
    let x = sorted[p];
    let mut left = p;
    let mut right = p + 1;
    let mut distance = 0.0;

    for _ in 0..k {
        let left_d = if left > 0 { Some(x - sorted[left - 1]) } else { None };
        let right_d = sorted.get(right).map(|v| v - x);
        match (left_d, right_d) {
            (Some(l), Some(r)) if l <= r => {
                distance = l;
                left -= 1;
            }
            (_, Some(r)) => {
                distance = r;
                right += 1;
            }
            (Some(l), None) => {
                distance = l;
                left -= 1;
            }
            (None, None) => break,
        }
    }
    distance
}

/// Points of `sorted` within `radius` of `x`, inclusive.
fn count_within(sorted: &[f64], x: f64, radius: f64) -> usize {
    let lo = sorted.partition_point(|v| x - v > radius);
    let hi = sorted.partition_point(|v| v - x <= radius);
    hi.saturating_sub(lo)
}

/// Estimate MI for one already-prepared feature vector.
fn mi_continuous_discrete(c: &[f64], d: &[i32], n_neighbors: usize) -> f64 {
    let mut by_label: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, label) in d.iter().enumerate() {
        by_label.entry(*label).or_default().push(i);
    }

    // (value, radius, k, class count) for points whose class has > 1 member
    let mut kept: Vec<(f64, f64, usize, usize)> = Vec::with_capacity(c.len());
    for indices in by_label.values() {
        let count = indices.len();
        if count < 2 {
            continue;
        }
        let k = n_neighbors.min(count - 1).max(1);
        let mut class_values: Vec<f64> = indices.iter().map(|&i| c[i]).collect();
        class_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        for p in 0..class_values.len() {
            let radius = next_toward_zero(kth_neighbour_distance(&class_values, p, k));
            kept.push((class_values[p], radius, k, count));
        }
    }

    let n = kept.len();
    if n == 0 {
        return 0.0;
    }

    let mut all_values: Vec<f64> = kept.iter().map(|(v, _, _, _)| *v).collect();
    all_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n_f = n as f64;
    let mean_psi_k = kept.iter().map(|(_, _, k, _)| digamma(*k as f64)).sum::<f64>() / n_f;
    let mean_psi_label = kept.iter().map(|(_, _, _, cnt)| digamma(*cnt as f64)).sum::<f64>() / n_f;
    let mean_psi_m = kept
        .iter()
        .map(|(v, r, _, _)| digamma(count_within(&all_values, *v, *r) as f64))
        .sum::<f64>()
        / n_f;

    (digamma(n_f) + mean_psi_k - mean_psi_label - mean_psi_m).max(0.0)
}

/// Mutual information of each feature with a discrete target.
///
/// Nulls count as 0 for this computation only. Each feature is scaled by
/// its standard deviation and jittered with `1e-10 * max(1, mean|x|)`
/// Gaussian noise drawn from a generator seeded by `config.seed`, so the
/// result is reproducible for a fixed seed. Scores are never negative.
pub fn mutual_info_classif(features: &[Vec<Option<f64>>], target: &[i32], config: &MiConfig) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    features
        .iter()
        .map(|feature| {
            debug_assert_eq!(feature.len(), target.len());
            let raw: Vec<f64> = feature
                .iter()
                .map(|v| v.filter(|x| !x.is_nan()).unwrap_or(0.0))
                .collect();

            let scale = match std_dev(&raw, 0) {
                Some(s) if s > 0.0 => s,
                _ => 1.0,
            };
            let scaled: Vec<f64> = raw.iter().map(|v| v / scale).collect();

            let abs_values: Vec<f64> = scaled.iter().map(|v| v.abs()).collect();
            let amplitude = 1e-10 * mean(&abs_values).unwrap_or(0.0).max(1.0);
            let jittered: Vec<f64> = scaled
                .iter()
                .map(|v| {
                    let noise: f64 = StandardNormal.sample(&mut rng);
                    v + amplitude * noise
                })
                .collect();

            mi_continuous_discrete(&jittered, target, config.n_neighbors)
        })
        .collect()
}
