//! Paired index bookkeeping for the indexed filter strategy.

use crate::{
    bit_vector::BitVector,
    overlay::{StorageIndexVector, TableIndexVector},
};

/// One candidate row seen at two granularities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct IndexPair {
    /// Index in the space the next overlay (or storage) expects.
    current: u32,
    /// Original table row this entry maps back to.
    global: u32,
}

/// Candidate rows threaded through an overlay stack.
///
/// Each entry couples the row's index in the space of the next layer with
/// the table row it started as. Entries are filtered and translated
/// together, so the two views can never fall out of step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexFilterHelper {
    entries: Vec<IndexPair>,
}

impl IndexFilterHelper {
    /// Helper whose current and global indices both start as `indices`.
    #[must_use]
    pub fn new(indices: Vec<u32>) -> Self {
        Self {
            entries: indices
                .into_iter()
                .map(|index| IndexPair {
                    current: index,
                    global: index,
                })
                .collect(),
        }
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no candidate is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current indices, in entry order.
    #[must_use]
    pub fn current(&self) -> TableIndexVector {
        TableIndexVector(self.entries.iter().map(|pair| pair.current).collect())
    }

    /// Global indices, in entry order.
    #[must_use]
    pub fn global(&self) -> Vec<u32> {
        self.entries.iter().map(|pair| pair.global).collect()
    }

    /// Consumes the helper, yielding its global indices in entry order.
    pub fn into_global(self) -> impl Iterator<Item = u32> {
        self.entries.into_iter().map(|pair| pair.global)
    }

    /// Replaces every current index with its translation into the next layer.
    ///
    /// # Panics
    ///
    /// Panics if `mapped` does not have one index per entry.
    pub fn advance(&mut self, mapped: StorageIndexVector) {
        assert_eq!(
            mapped.0.len(),
            self.entries.len(),
            "overlay translated {} of {} indices",
            mapped.0.len(),
            self.entries.len()
        );
        for (pair, current) in self.entries.iter_mut().zip(mapped.0) {
            pair.current = current;
        }
    }

    /// Splits into `(set, unset)` by the entry-aligned bits of `bv`.
    ///
    /// # Panics
    ///
    /// Panics if `bv` does not have one bit per entry.
    #[must_use]
    pub fn partition(self, bv: &BitVector) -> (IndexFilterHelper, IndexFilterHelper) {
        assert_eq!(
            bv.size() as usize,
            self.entries.len(),
            "partition bit vector does not match candidate count"
        );
        let (set, unset): (Vec<_>, Vec<_>) = self
            .entries
            .into_iter()
            .zip(bv.iterate_all_bits())
            .partition(|(_, (_, is_set))| *is_set);
        let strip = |pairs: Vec<(IndexPair, (u32, bool))>| IndexFilterHelper {
            entries: pairs.into_iter().map(|(pair, _)| pair).collect(),
        };
        (strip(set), strip(unset))
    }

    /// Keeps the entries whose bit is set; returns how many were removed.
    ///
    /// # Panics
    ///
    /// Panics if `bv` does not have one bit per entry.
    pub fn keep_at_set(&mut self, bv: &BitVector) -> u32 {
        assert_eq!(
            bv.size() as usize,
            self.entries.len(),
            "filter bit vector does not match candidate count"
        );
        let before = self.entries.len();
        let mut bits = bv.iterate_all_bits();
        self.entries
            .retain(|_| bits.next().is_some_and(|(_, is_set)| is_set));
        (before - self.entries.len()) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_identical_views() {
        let helper = IndexFilterHelper::new(vec![3, 7, 9]);
        assert_eq!(helper.current(), TableIndexVector(vec![3, 7, 9]));
        assert_eq!(helper.global(), vec![3, 7, 9]);
    }

    #[test]
    fn advance_only_moves_current() {
        let mut helper = IndexFilterHelper::new(vec![3, 7, 9]);
        helper.advance(StorageIndexVector(vec![0, 1, 2]));
        assert_eq!(helper.current(), TableIndexVector(vec![0, 1, 2]));
        assert_eq!(helper.global(), vec![3, 7, 9]);
    }

    #[test]
    #[should_panic(expected = "translated 2 of 3")]
    fn advance_rejects_length_change() {
        let mut helper = IndexFilterHelper::new(vec![3, 7, 9]);
        helper.advance(StorageIndexVector(vec![0, 1]));
    }

    #[test]
    fn partition_keeps_pairs_together() {
        let mut helper = IndexFilterHelper::new(vec![10, 11, 12, 13]);
        helper.advance(StorageIndexVector(vec![0, 1, 2, 3]));
        let (set, unset) = helper.partition(&BitVector::from_set_positions(4, [1, 3]));
        assert_eq!(set.current(), TableIndexVector(vec![1, 3]));
        assert_eq!(set.global(), vec![11, 13]);
        assert_eq!(unset.current(), TableIndexVector(vec![0, 2]));
        assert_eq!(unset.global(), vec![10, 12]);
    }

    #[test]
    fn partition_with_nothing_set_moves_all_to_unset() {
        let helper = IndexFilterHelper::new(vec![1, 2]);
        let (set, unset) = helper.partition(&BitVector::new(2, false));
        assert!(set.is_empty());
        assert_eq!(unset.len(), 2);
    }

    #[test]
    fn keep_at_set_reports_removed_count() {
        let mut helper = IndexFilterHelper::new(vec![4, 5, 6, 7, 8]);
        let removed = helper.keep_at_set(&BitVector::from_set_positions(5, [0, 4]));
        assert_eq!(removed, 3);
        assert_eq!(helper.into_global().collect::<Vec<_>>(), vec![4, 8]);
    }
}
