//! Interval index for point-containment queries
//!
//! Uses rust-lapper for O(log n + k) interval queries.

use rust_lapper::{Interval, Lapper};
use serde::{Deserialize, Serialize};

/// Position of a gene in the locator's canonical store
pub type GeneSlot = u32;

/// One indexed interval: `[start, end)` tagged with a gene slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalEntry {
    pub start: u64,
    pub end: u64,
    pub slot: GeneSlot,
}

/// Point-containment contract used by the locator
///
/// Implementations answer "which intervals contain this position" and are
/// free to choose their internal layout.
pub trait PointIndex: Send + Sync {
    /// Build from every interval of a partition
    fn build(entries: Vec<IntervalEntry>) -> Self
    where
        Self: Sized;

    /// Slots whose interval contains `position` (`start <= position < end`),
    /// in no particular order
    fn containing(&self, position: u64) -> Vec<GeneSlot>;

    /// Number of indexed intervals
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lapper-backed interval index for one chromosome
///
/// Serializes as its entry list; the lapper is rebuilt on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<IntervalEntry>", into = "Vec<IntervalEntry>")]
pub struct IntervalIndex {
    lapper: Lapper<u64, GeneSlot>,
}

impl IntervalIndex {
    /// All indexed entries, sorted by start
    pub fn entries(&self) -> impl Iterator<Item = IntervalEntry> + '_ {
        self.lapper.intervals.iter().map(|iv| IntervalEntry {
            start: iv.start,
            end: iv.stop,
            slot: iv.val,
        })
    }
}

impl PointIndex for IntervalIndex {
    fn build(entries: Vec<IntervalEntry>) -> Self {
        let intervals = entries
            .into_iter()
            .map(|e| Interval {
                start: e.start,
                stop: e.end,
                val: e.slot,
            })
            .collect();
        Self {
            lapper: Lapper::new(intervals),
        }
    }

    fn containing(&self, position: u64) -> Vec<GeneSlot> {
        // a point is the one-base query [position, position + 1)
        self.lapper
            .find(position, position.saturating_add(1))
            .map(|iv| iv.val)
            .collect()
    }

    fn len(&self) -> usize {
        self.lapper.len()
    }
}

impl From<Vec<IntervalEntry>> for IntervalIndex {
    fn from(entries: Vec<IntervalEntry>) -> Self {
        Self::build(entries)
    }
}

impl From<IntervalIndex> for Vec<IntervalEntry> {
    fn from(index: IntervalIndex) -> Self {
        index.entries().collect()
    }
}

impl PartialEq for IntervalIndex {
    fn eq(&self, other: &Self) -> bool {
        self.entries().eq(other.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: u64, end: u64, slot: GeneSlot) -> IntervalEntry {
        IntervalEntry { start, end, slot }
    }

    fn create_test_index() -> IntervalIndex {
        IntervalIndex::build(vec![
            entry(100, 200, 0),
            entry(150, 300, 1),
            entry(500, 600, 2),
        ])
    }

    fn sorted(mut slots: Vec<GeneSlot>) -> Vec<GeneSlot> {
        slots.sort_unstable();
        slots
    }

    #[test]
    fn test_index_creation() {
        let index = create_test_index();
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_point_inside_one() {
        let index = create_test_index();
        assert_eq!(index.containing(120), vec![0]);
        assert_eq!(index.containing(550), vec![2]);
    }

    #[test]
    fn test_point_inside_many() {
        let index = create_test_index();
        assert_eq!(sorted(index.containing(175)), vec![0, 1]);
    }

    #[test]
    fn test_half_open_bounds() {
        let index = create_test_index();
        // start is inside, end is not
        assert_eq!(index.containing(100), vec![0]);
        assert_eq!(sorted(index.containing(199)), vec![0, 1]);
        assert_eq!(index.containing(200), vec![1]);
        assert_eq!(index.containing(300), Vec::<GeneSlot>::new());
        assert_eq!(index.containing(600), Vec::<GeneSlot>::new());
    }

    #[test]
    fn test_no_overlap() {
        let index = create_test_index();
        assert!(index.containing(50).is_empty());
        assert!(index.containing(400).is_empty());
        assert!(index.containing(u64::MAX).is_empty());
    }

    #[test]
    fn test_entries_round_trip_through_serde() {
        let index = create_test_index();
        let bytes = bincode::serialize(&index).unwrap();
        let restored: IntervalIndex = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, index);
        assert_eq!(sorted(restored.containing(175)), vec![0, 1]);
    }
}
