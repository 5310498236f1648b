use super::{
    Overlay, OverlayOp, StorageBitVector, StorageIndexVector, StorageRange, TableBitVector,
    TableIndexVector, TableRange,
};
use crate::bit_vector::BitVector;

/// Overlay exposing an order-preserving subset of the positions beneath it.
///
/// `selector` has one bit per storage-side position; table row `i` maps to
/// the position of the `i`-th set bit.
#[derive(Clone, Copy, Debug)]
pub struct SelectorOverlay<'a> {
    selector: &'a BitVector,
}

impl<'a> SelectorOverlay<'a> {
    /// Overlay over the given selection bitmap.
    #[must_use]
    pub fn new(selector: &'a BitVector) -> Self {
        Self { selector }
    }
}

impl Overlay for SelectorOverlay<'_> {
    fn name(&self) -> &'static str {
        "selector"
    }

    fn map_to_storage_range(&self, range: &TableRange) -> Option<StorageRange> {
        if range.is_empty() {
            return Some(StorageRange(0..0));
        }
        let start = self.selector.index_of_nth_set(range.0.start);
        let end = self.selector.index_of_nth_set(range.0.end - 1) + 1;
        Some(StorageRange(start..end))
    }

    fn map_to_table_bit_vector(
        &self,
        table_range: &TableRange,
        storage: StorageBitVector,
        _op: OverlayOp,
    ) -> TableBitVector {
        let bv = self
            .selector
            .iterate_set_bits()
            .skip(table_range.0.start as usize)
            .take(table_range.len() as usize)
            .map(|position| storage.is_set(position))
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
        StorageIndexVector(self.selector.indices_of_nth_set(&indices.0))
    }

    fn index_search(&self, _op: OverlayOp, indices: &TableIndexVector) -> BitVector {
        // Every row needs the layer beneath; nothing is decided here.
        BitVector::new(indices.0.len() as u32, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_map_to_selected_positions() {
        let selector = BitVector::from_set_positions(10, [1, 4, 5, 8]);
        let overlay = SelectorOverlay::new(&selector);
        assert_eq!(
            overlay.map_to_storage_range(&TableRange(1..3)),
            Some(StorageRange(4..6))
        );
        assert_eq!(
            overlay.map_to_storage_index_vector(&TableIndexVector(vec![3, 0])),
            StorageIndexVector(vec![8, 1])
        );
    }

    #[test]
    fn lifting_reads_only_selected_positions() {
        let selector = BitVector::from_set_positions(10, [1, 4, 5, 8]);
        let overlay = SelectorOverlay::new(&selector);
        let storage = StorageBitVector {
            range: StorageRange(1..9),
            // Positions 2 and 8 matched; 2 is not selected.
            bv: BitVector::from_set_positions(8, [1, 7]),
        };
        let table = overlay.map_to_table_bit_vector(&TableRange(0..4), storage, OverlayOp::Other);
        assert_eq!(table.bv.iterate_set_bits().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn index_translation_spans_many_words() {
        // Every third position is selected, across ~47 words.
        let selector: BitVector = (0..3_000).map(|i| i % 3 == 0).collect();
        let overlay = SelectorOverlay::new(&selector);
        let rows: Vec<u32> = (0..1_000).rev().step_by(7).collect();
        let expected: Vec<u32> = rows.iter().map(|&row| row * 3).collect();
        assert_eq!(
            overlay.map_to_storage_index_vector(&TableIndexVector(rows)),
            StorageIndexVector(expected)
        );
    }

    #[test]
    fn always_defers_to_storage() {
        let selector = BitVector::new(3, true);
        let overlay = SelectorOverlay::new(&selector);
        let indices = TableIndexVector(vec![0, 2]);
        let lookup = overlay.is_storage_lookup_required(OverlayOp::IsNull, &indices);
        assert_eq!(lookup.count_set_bits(), 2);
    }
}
