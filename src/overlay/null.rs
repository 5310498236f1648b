use super::{
    Overlay, OverlayOp, StorageBitVector, StorageIndexVector, StorageRange, TableBitVector,
    TableIndexVector, TableRange,
};
use crate::bit_vector::{BitVector, BitVectorBuilder};

/// Overlay for a nullable column whose storage holds only the non-null values.
///
/// `non_null` has one bit per table-side row. Table row `i` maps to storage
/// position `rank(i)`, the number of non-null rows before it.
#[derive(Clone, Copy, Debug)]
pub struct NullOverlay<'a> {
    non_null: &'a BitVector,
}

impl<'a> NullOverlay<'a> {
    /// Overlay over the given non-null bitmap.
    #[must_use]
    pub fn new(non_null: &'a BitVector) -> Self {
        Self { non_null }
    }
}

impl Overlay for NullOverlay<'_> {
    fn name(&self) -> &'static str {
        "null"
    }

    fn map_to_storage_range(&self, range: &TableRange) -> Option<StorageRange> {
        let start = self.non_null.count_set_bits_until(range.0.start);
        let end = self.non_null.count_set_bits_until(range.0.end);
        Some(StorageRange(start..end))
    }

    fn map_to_table_bit_vector(
        &self,
        table_range: &TableRange,
        storage: StorageBitVector,
        op: OverlayOp,
    ) -> TableBitVector {
        let null_matches = op == OverlayOp::IsNull;
        let mut storage_pos = storage.range.0.start;
        let mut builder = BitVectorBuilder::with_capacity(table_range.len());
        for row in table_range.0.clone() {
            if self.non_null.is_set(row) {
                builder.append(storage.is_set(storage_pos));
                storage_pos += 1;
            } else {
                builder.append(null_matches);
            }
        }
        debug_assert_eq!(storage_pos, storage.range.0.end);
        TableBitVector {
            range: table_range.clone(),
            bv: builder.build(),
        }
    }

    fn is_storage_lookup_required(&self, op: OverlayOp, indices: &TableIndexVector) -> BitVector {
        if op != OverlayOp::Other {
            return BitVector::new(indices.0.len() as u32, false);
        }
        indices.0.iter().map(|&row| self.non_null.is_set(row)).collect()
    }

    fn map_to_storage_index_vector(&self, indices: &TableIndexVector) -> StorageIndexVector {
        StorageIndexVector(
            indices
                .0
                .iter()
                .map(|&row| {
                    debug_assert!(self.non_null.is_set(row), "row {row} is null");
                    self.non_null.count_set_bits_until(row)
                })
                .collect(),
        )
    }

    fn index_search(&self, op: OverlayOp, indices: &TableIndexVector) -> BitVector {
        indices
            .0
            .iter()
            .map(|&row| match op {
                OverlayOp::IsNull => !self.non_null.is_set(row),
                OverlayOp::IsNotNull => self.non_null.is_set(row),
                // Nulls never satisfy a value comparison.
                OverlayOp::Other => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_bits(bv: &BitVector) -> Vec<u32> {
        bv.iterate_set_bits().collect()
    }

    // Rows 1 and 3 are null; storage holds rows 0, 2, 4 at positions 0, 1, 2.
    fn non_null() -> BitVector {
        BitVector::from_set_positions(5, [0, 2, 4])
    }

    #[test]
    fn range_maps_to_ranks() {
        let bits = non_null();
        let overlay = NullOverlay::new(&bits);
        assert_eq!(
            overlay.map_to_storage_range(&TableRange(1..5)),
            Some(StorageRange(1..3))
        );
        assert_eq!(
            overlay.map_to_storage_range(&TableRange(0..5)),
            Some(StorageRange(0..3))
        );
    }

    #[test]
    fn lifting_fills_null_rows_by_operator() {
        let bits = non_null();
        let overlay = NullOverlay::new(&bits);
        let storage = || StorageBitVector {
            range: StorageRange(1..3),
            bv: BitVector::from_set_positions(2, [1]),
        };

        let compared =
            overlay.map_to_table_bit_vector(&TableRange(1..5), storage(), OverlayOp::Other);
        assert_eq!(compared.range, TableRange(1..5));
        assert_eq!(set_bits(&compared.bv), vec![3]);

        let is_null =
            overlay.map_to_table_bit_vector(&TableRange(1..5), storage(), OverlayOp::IsNull);
        assert_eq!(set_bits(&is_null.bv), vec![0, 2, 3]);
    }

    #[test]
    fn null_checks_never_need_storage() {
        let bits = non_null();
        let overlay = NullOverlay::new(&bits);
        let indices = TableIndexVector(vec![0, 1, 4]);
        let lookup = overlay.is_storage_lookup_required(OverlayOp::IsNull, &indices);
        assert_eq!(lookup.count_set_bits(), 0);

        let lookup = overlay.is_storage_lookup_required(OverlayOp::Other, &indices);
        assert_eq!(set_bits(&lookup), vec![0, 2]);
    }

    #[test]
    fn index_paths_translate_and_decide_locally() {
        let bits = non_null();
        let overlay = NullOverlay::new(&bits);
        assert_eq!(
            overlay.map_to_storage_index_vector(&TableIndexVector(vec![4, 0, 2])),
            StorageIndexVector(vec![2, 0, 1])
        );

        let nulls = TableIndexVector(vec![1, 2, 3]);
        assert_eq!(set_bits(&overlay.index_search(OverlayOp::IsNull, &nulls)), vec![0, 2]);
        assert_eq!(set_bits(&overlay.index_search(OverlayOp::IsNotNull, &nulls)), vec![1]);
        assert_eq!(overlay.index_search(OverlayOp::Other, &nulls).count_set_bits(), 0);
    }
}
