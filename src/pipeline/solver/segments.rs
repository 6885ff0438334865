//! WoE/IV of every run of consecutive prebins
//!
//! The optimal merge only ever asks "what if prebins `start..=end` became
//! one bin", so all answers are computed once from prefix sums and kept in a
//! flat upper-triangular table.

use crate::pipeline::iv::{calculate_woe_iv, WoeBin};

/// Prebins `start..=end` merged into one bin
#[derive(Debug, Clone, Copy, Default)]
pub struct Segment {
    pub events: f64,
    pub non_events: f64,
    pub count: f64,
    pub woe: f64,
    pub iv: f64,
}

#[derive(Debug)]
pub struct SegmentTable {
    len: usize,
    cells: Vec<Segment>,
}

impl SegmentTable {
    pub fn new(prebins: &[WoeBin], total_events: f64, total_non_events: f64) -> Self {
        let len = prebins.len();

        // prefix[k] sums prebins 0..k
        let mut prefix = vec![(0.0, 0.0, 0.0); len + 1];
        for (k, bin) in prebins.iter().enumerate() {
            let (e, ne, c) = prefix[k];
            prefix[k + 1] = (e + bin.events, ne + bin.non_events, c + bin.count);
        }

        let mut cells = vec![Segment::default(); len * len];
        for start in 0..len {
            for end in start..len {
                let events = prefix[end + 1].0 - prefix[start].0;
                let non_events = prefix[end + 1].1 - prefix[start].1;
                let count = prefix[end + 1].2 - prefix[start].2;
                let (woe, iv) = calculate_woe_iv(events, non_events, total_events, total_non_events);
                cells[start * len + end] = Segment {
                    events,
                    non_events,
                    count,
                    woe,
                    iv,
                };
            }
        }

        Self { len, cells }
    }

    /// Number of prebins
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Merged statistics of prebins `start..=end`
    #[inline]
    pub fn segment(&self, start: usize, end: usize) -> &Segment {
        debug_assert!(start <= end && end < self.len);
        &self.cells[start * self.len + end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_merged_counts() {
        let table = SegmentTable::new(&prebins(&[(5.0, 15.0), (10.0, 10.0), (15.0, 5.0)]), 30.0, 30.0);
        assert_eq!(table.len(), 3);

        let first_two = table.segment(0, 1);
        assert_eq!(first_two.events, 15.0);
        assert_eq!(first_two.non_events, 25.0);
        assert_eq!(first_two.count, 40.0);

        let last = table.segment(2, 2);
        assert_eq!(last.events, 15.0);
        assert!(last.woe > 0.0);
    }

    #[test]
    fn test_whole_range_carries_no_information() {
        let table = SegmentTable::new(&prebins(&[(5.0, 15.0), (10.0, 10.0), (15.0, 5.0)]), 30.0, 30.0);
        let all = table.segment(0, 2);
        assert_eq!(all.count, 60.0);
        assert!(all.woe.abs() < 1e-12);
        assert!(all.iv.abs() < 1e-12);
    }

    #[test]
    fn test_empty_prebins() {
        let table = SegmentTable::new(&[], 0.0, 0.0);
        assert!(table.is_empty());
    }
}
