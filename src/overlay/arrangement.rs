use super::{
    Overlay, OverlayOp, StorageBitVector, StorageIndexVector, StorageRange, TableBitVector,
    TableIndexVector, TableRange,
};
use crate::bit_vector::BitVector;

/// Overlay reordering (and possibly repeating) the positions beneath it.
///
/// Table row `i` maps to `arrangement[i]`.
#[derive(Clone, Copy, Debug)]
pub struct ArrangementOverlay<'a> {
    arrangement: &'a [u32],
}

impl<'a> ArrangementOverlay<'a> {
    /// Overlay over the given arrangement.
    #[must_use]
    pub fn new(arrangement: &'a [u32]) -> Self {
        Self { arrangement }
    }

    fn slice(&self, range: &TableRange) -> &'a [u32] {
        &self.arrangement[range.0.start as usize..range.0.end as usize]
    }
}

impl Overlay for ArrangementOverlay<'_> {
    fn name(&self) -> &'static str {
        "arrangement"
    }

    /// The covering span of every position the range maps to.
    fn map_to_storage_range(&self, range: &TableRange) -> Option<StorageRange> {
        let mapped = self.slice(range);
        let min = mapped.iter().copied().min();
        let max = mapped.iter().copied().max();
        match (min, max) {
            (Some(min), Some(max)) => Some(StorageRange(min..max + 1)),
            _ => Some(StorageRange(0..0)),
        }
    }

    fn map_to_table_bit_vector(
        &self,
        table_range: &TableRange,
        storage: StorageBitVector,
        _op: OverlayOp,
    ) -> TableBitVector {
        let bv = self
            .slice(table_range)
            .iter()
            .map(|&position| storage.is_set(position))
            .collect();
        TableBitVector {
            range: table_range.clone(),
            bv,
        }
    }

    fn is_storage_lookup_required(&self, _op: OverlayOp, indices: &TableIndexVector) -> BitVector {
        BitVector::new(indices.0.len() as u32, true)
    }

    fn map_to_storage_index_vector(&self, indices: &TableIndexVector) -> StorageIndexVector {
        StorageIndexVector(
            indices
                .0
                .iter()
                .map(|&row| self.arrangement[row as usize])
                .collect(),
        )
    }

    fn index_search(&self, _op: OverlayOp, indices: &TableIndexVector) -> BitVector {
        BitVector::new(indices.0.len() as u32, false)
    }
}
