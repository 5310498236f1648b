//! Index-space translators stacked between table rows and raw storage.
//!
//! An overlay sits between two adjacent index spaces. Its "table" side faces
//! the caller (or the next overlay out), its "storage" side faces the next
//! overlay in or the storage itself. The executor walks a stack of overlays
//! outer to inner to narrow what storage must scan, then inner to outer to
//! lift storage answers back to table rows.

mod arrangement;
mod null;
mod selector;

use std::ops::Range;

use colfilter_predicate::FilterOp;

pub use arrangement::ArrangementOverlay;
pub use null::NullOverlay;
pub use selector::SelectorOverlay;

use crate::bit_vector::BitVector;

/// Operator as seen by an overlay, which never sees literal values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayOp {
    /// `IS NULL`.
    IsNull,
    /// `IS NOT NULL`.
    IsNotNull,
    /// Any comparison against a present value.
    Other,
}

impl From<FilterOp> for OverlayOp {
    fn from(op: FilterOp) -> Self {
        match op {
            FilterOp::IsNull => OverlayOp::IsNull,
            FilterOp::IsNotNull => OverlayOp::IsNotNull,
            _ => OverlayOp::Other,
        }
    }
}

/// Contiguous span in an overlay's table-side index space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRange(pub Range<u32>);

/// Contiguous span in an overlay's storage-side index space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageRange(pub Range<u32>);

impl TableRange {
    /// Number of positions covered.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.0.end.saturating_sub(self.0.start)
    }

    /// Whether the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageRange {
    /// Number of positions covered.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.0.end.saturating_sub(self.0.start)
    }

    /// Whether the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered table-side indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableIndexVector(pub Vec<u32>);

/// Ordered storage-side indices, positionally aligned with their table-side source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageIndexVector(pub Vec<u32>);

/// Bit vector local to a table-side range: bit `i` is position `range.start + i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableBitVector {
    /// Span the bits describe.
    pub range: TableRange,
    /// One bit per position of `range`.
    pub bv: BitVector,
}

/// Bit vector local to a storage-side range: bit `i` is position `range.start + i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageBitVector {
    /// Span the bits describe.
    pub range: StorageRange,
    /// One bit per position of `range`.
    pub bv: BitVector,
}

impl StorageBitVector {
    /// Whether storage position `index` (absolute) is set.
    #[must_use]
    pub fn is_set(&self, index: u32) -> bool {
        self.bv.is_set(index - self.range.0.start)
    }
}

/// Capability every overlay implements to take part in both filter strategies.
///
/// Implementations reference, never own, the side data defining their
/// mapping, and are stateless between calls.
pub trait Overlay {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Translates a table-side span to the storage-side span it depends on.
    ///
    /// Returns `None` when the overlay cannot express the dependency as one
    /// contiguous span; the executor then uses the indexed strategy.
    fn map_to_storage_range(&self, range: &TableRange) -> Option<StorageRange>;

    /// Lifts a storage-side result back to `table_range`, which must be the
    /// span previously passed to [`Overlay::map_to_storage_range`].
    fn map_to_table_bit_vector(
        &self,
        table_range: &TableRange,
        storage: StorageBitVector,
        op: OverlayOp,
    ) -> TableBitVector;

    /// One bit per input index: set when the predicate needs the next layer,
    /// unset when this overlay can decide it alone.
    fn is_storage_lookup_required(&self, op: OverlayOp, indices: &TableIndexVector) -> BitVector;

    /// Translates indices that need lookup into the next layer's space, order-preserving.
    fn map_to_storage_index_vector(&self, indices: &TableIndexVector) -> StorageIndexVector;

    /// Decides the predicate for indices this overlay resolves alone; one bit per input.
    fn index_search(&self, op: OverlayOp, indices: &TableIndexVector) -> BitVector;
}

/// The overlays colfilter ships, as one closed set.
#[derive(Clone, Copy, Debug)]
pub enum ColumnOverlay<'a> {
    /// See [`NullOverlay`].
    Null(NullOverlay<'a>),
    /// See [`SelectorOverlay`].
    Selector(SelectorOverlay<'a>),
    /// See [`ArrangementOverlay`].
    Arrangement(ArrangementOverlay<'a>),
}

impl ColumnOverlay<'_> {
    fn inner(&self) -> &dyn Overlay {
        match self {
            ColumnOverlay::Null(overlay) => overlay,
            ColumnOverlay::Selector(overlay) => overlay,
            ColumnOverlay::Arrangement(overlay) => overlay,
        }
    }
}

impl Overlay for ColumnOverlay<'_> {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn map_to_storage_range(&self, range: &TableRange) -> Option<StorageRange> {
        self.inner().map_to_storage_range(range)
    }

    fn map_to_table_bit_vector(
        &self,
        table_range: &TableRange,
        storage: StorageBitVector,
        op: OverlayOp,
    ) -> TableBitVector {
        self.inner().map_to_table_bit_vector(table_range, storage, op)
    }

    fn is_storage_lookup_required(&self, op: OverlayOp, indices: &TableIndexVector) -> BitVector {
        self.inner().is_storage_lookup_required(op, indices)
    }

    fn map_to_storage_index_vector(&self, indices: &TableIndexVector) -> StorageIndexVector {
        self.inner().map_to_storage_index_vector(indices)
    }

    fn index_search(&self, op: OverlayOp, indices: &TableIndexVector) -> BitVector {
        self.inner().index_search(op, indices)
    }
}
