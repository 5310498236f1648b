//! Typed column buffers answering comparisons against a literal.
//!
//! Storage sits beneath every overlay and only ever sees storage-space
//! positions. It never holds nulls: nullability is an overlay concern.

mod numeric;

use std::ops::Range;

use colfilter_predicate::{FilterOp, ScalarValue, ValueType};

pub use numeric::NumericStorage;

use crate::bit_vector::BitVector;

/// Comparison contract every column buffer exposes to the executor.
///
/// Callers guarantee that `value` has the storage's [`ValueType`] for
/// ordered comparisons; a mismatch is a programming error and panics.
pub trait Storage {
    /// Number of stored elements.
    fn size(&self) -> u32;

    /// SQL type of the stored elements.
    fn value_type(&self) -> ValueType;

    /// Evaluates `element op value` for every position in `range`.
    ///
    /// The result has `range.len()` bits; bit `i` describes position
    /// `range.start + i`.
    fn linear_search(&self, op: FilterOp, value: &ScalarValue, range: Range<u32>) -> BitVector;

    /// Evaluates `element op value` at each of `indices`, in the given order.
    ///
    /// The result has one bit per input index.
    fn index_search(&self, op: FilterOp, value: &ScalarValue, indices: &[u32]) -> BitVector;
}
