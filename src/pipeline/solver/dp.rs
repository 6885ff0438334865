//! Exact dynamic program over consecutive prebin partitions
//!
//! `best[i][j][c]` is the highest IV of a partition of prebins `0..=j` into
//! `c` bins whose last bin is `i..=j`. Transitions extend a partition ending
//! at `i - 1` by the segment `i..=j` when the WoE trend allows it.

use super::monotonicity::MonotonicityConstraint;
use super::segments::SegmentTable;
use super::SolverResult;

#[derive(Clone, Copy)]
struct Cell {
    iv: f64,
    /// Start of the previous segment (None for the first segment)
    prev_start: Option<usize>,
}

pub(super) fn solve(
    table: &SegmentTable,
    constraint: MonotonicityConstraint,
    max_bins: Option<usize>,
) -> SolverResult {
    let n = table.len();
    let cap = max_bins.unwrap_or(n).clamp(1, n.max(1));
    let idx = |i: usize, j: usize, c: usize| (i * n + j) * (cap + 1) + c;
    let mut best: Vec<Option<Cell>> = vec![None; n * n * (cap + 1)];

    for j in 0..n {
        best[idx(0, j, 1)] = Some(Cell {
            iv: table.segment(0, j).iv,
            prev_start: None,
        });
    }

    for j in 0..n {
        for i in 1..=j {
            let segment = table.segment(i, j);
            for c in 2..=cap {
                let mut cell: Option<Cell> = None;
                for h in 0..i {
                    let Some(prev) = best[idx(h, i - 1, c - 1)] else {
                        continue;
                    };
                    let prev_woe = table.segment(h, i - 1).woe;
                    if !constraint.permits(prev_woe, segment.woe) {
                        continue;
                    }
                    let iv = prev.iv + segment.iv;
                    if cell.map_or(true, |current| iv > current.iv) {
                        cell = Some(Cell {
                            iv,
                            prev_start: Some(h),
                        });
                    }
                }
                best[idx(i, j, c)] = cell;
            }
        }
    }

    // Best terminal state; a single bin is always feasible.
    let last = n - 1;
    let mut end_state = (0, 1);
    let mut end_iv = f64::NEG_INFINITY;
    for i in 0..n {
        for c in 1..=cap {
            if let Some(cell) = best[idx(i, last, c)] {
                if cell.iv > end_iv + 1e-12 {
                    end_iv = cell.iv;
                    end_state = (i, c);
                }
            }
        }
    }

    let mut boundaries = Vec::with_capacity(end_state.1);
    let (mut start, mut count) = end_state;
    let mut end = last;
    loop {
        boundaries.push((start, end));
        let prev = best[idx(start, end, count)].and_then(|cell| cell.prev_start);
        match prev {
            Some(h) => {
                end = start - 1;
                start = h;
                count -= 1;
            }
            None => break,
        }
    }
    boundaries.reverse();

    SolverResult {
        bin_boundaries: boundaries,
        total_iv: end_iv.max(0.0),
        monotonicity_applied: constraint,
    }
}

#[cfg(test)]
mod tests {
    use super::super::segments::SegmentTable;
    use super::*;
    use crate::pipeline::iv::WoeBin;

    fn prebins(counts: &[(f64, f64)]) -> Vec<WoeBin> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &(events, non_events))| WoeBin {
                lower_bound: i as f64,
                upper_bound: i as f64 + 1.0,
                events,
                non_events,
                woe: 0.0,
                iv_contribution: 0.0,
                count: events + non_events,
                population_pct: 0.0,
                event_rate: events / (events + non_events),
            })
            .collect()
    }

    #[test]
    fn test_single_prebin() {
        let bins = prebins(&[(5.0, 5.0)]);
        let table = SegmentTable::new(&bins, 5.0, 5.0);
        let result = solve(&table, MonotonicityConstraint::Ascending, None);
        assert_eq!(result.bin_boundaries, vec![(0, 0)]);
    }

    #[test]
    fn test_partition_covers_all_prebins() {
        let bins = prebins(&[(1.0, 9.0), (5.0, 5.0), (2.0, 8.0), (7.0, 3.0), (9.0, 1.0)]);
        let table = SegmentTable::new(&bins, 24.0, 26.0);
        for constraint in [
            MonotonicityConstraint::None,
            MonotonicityConstraint::Ascending,
            MonotonicityConstraint::Descending,
        ] {
            let result = solve(&table, constraint, None);
            let mut expected_start = 0;
            for &(s, e) in &result.bin_boundaries {
                assert_eq!(s, expected_start);
                assert!(e >= s);
                expected_start = e + 1;
            }
            assert_eq!(expected_start, bins.len());
        }
    }

    #[test]
    fn test_descending_trend() {
        let bins = prebins(&[(9.0, 1.0), (6.0, 4.0), (2.0, 8.0)]);
        let table = SegmentTable::new(&bins, 17.0, 13.0);
        let result = solve(&table, MonotonicityConstraint::Descending, None);
        assert_eq!(result.bin_boundaries.len(), 3);

        let ascending = solve(&table, MonotonicityConstraint::Ascending, None);
        assert_eq!(ascending.bin_boundaries, vec![(0, 2)]);
        assert!(ascending.total_iv < result.total_iv);
    }
}
