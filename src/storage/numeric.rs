use std::ops::Range;

use arrow::{
    array::{Array, ArrowPrimitiveType, PrimitiveArray},
    buffer::ScalarBuffer,
};
use colfilter_predicate::{FilterOp, ScalarValue, ScalarValueRef, ValueType};

use super::Storage;
use crate::bit_vector::{BitVector, BitVectorBuilder};

/// Immutable numeric column buffer backed by Arrow scalar buffers.
///
/// Integer elements are compared against `Long` literals after widening to
/// `i64`; double elements against `Double` literals under IEEE partial order.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericStorage {
    /// 32-bit signed integers.
    Int32(ScalarBuffer<i32>),
    /// 32-bit unsigned integers.
    UInt32(ScalarBuffer<u32>),
    /// 64-bit signed integers.
    Int64(ScalarBuffer<i64>),
    /// 64-bit floats.
    Double(ScalarBuffer<f64>),
}

impl NumericStorage {
    /// Element at `index`, widened to `Long` or `Double`.
    #[must_use]
    pub fn value_at(&self, index: u32) -> ScalarValueRef<'static> {
        let index = index as usize;
        match self {
            NumericStorage::Int32(values) => ScalarValueRef::Long(i64::from(values[index])),
            NumericStorage::UInt32(values) => ScalarValueRef::Long(i64::from(values[index])),
            NumericStorage::Int64(values) => ScalarValueRef::Long(values[index]),
            NumericStorage::Double(values) => ScalarValueRef::Double(values[index]),
        }
    }

    /// Copies the non-null slots of an Arrow array, preserving order.
    pub(crate) fn non_null_values<T>(array: &PrimitiveArray<T>) -> ScalarBuffer<T::Native>
    where
        T: ArrowPrimitiveType,
    {
        if array.null_count() == 0 {
            return array.values().clone();
        }
        array.iter().flatten().collect::<Vec<_>>().into()
    }

    fn len(&self) -> usize {
        match self {
            NumericStorage::Int32(values) => values.len(),
            NumericStorage::UInt32(values) => values.len(),
            NumericStorage::Int64(values) => values.len(),
            NumericStorage::Double(values) => values.len(),
        }
    }

    /// Runs `op value` over the elements at `positions`, one bit each.
    fn search<I>(&self, op: FilterOp, value: &ScalarValue, positions: I, len: u32) -> BitVector
    where
        I: Iterator<Item = u32>,
    {
        match op {
            FilterOp::IsNull | FilterOp::Glob => return BitVector::new(len, false),
            FilterOp::IsNotNull => return BitVector::new(len, true),
            _ => {}
        }
        assert_eq!(
            value.value_type(),
            self.value_type(),
            "literal {value} does not match {} storage",
            self.value_type()
        );
        match (self, value) {
            (NumericStorage::Int32(values), ScalarValue::Long(rhs)) => {
                compare_each(values, positions, len, |lhs| {
                    op.test_ordering(Some(i64::from(lhs).cmp(rhs)))
                })
            }
            (NumericStorage::UInt32(values), ScalarValue::Long(rhs)) => {
                compare_each(values, positions, len, |lhs| {
                    op.test_ordering(Some(i64::from(lhs).cmp(rhs)))
                })
            }
            (NumericStorage::Int64(values), ScalarValue::Long(rhs)) => {
                compare_each(values, positions, len, |lhs| {
                    op.test_ordering(Some(lhs.cmp(rhs)))
                })
            }
            (NumericStorage::Double(values), ScalarValue::Double(rhs)) => {
                compare_each(values, positions, len, |lhs: f64| {
                    op.test_ordering(lhs.partial_cmp(rhs))
                })
            }
            _ => unreachable!("value type checked above"),
        }
    }
}

fn compare_each<T, I, F>(values: &[T], positions: I, len: u32, matches: F) -> BitVector
where
    T: Copy,
    I: Iterator<Item = u32>,
    F: Fn(T) -> bool,
{
    let mut builder = BitVectorBuilder::with_capacity(len);
    for position in positions {
        builder.append(matches(values[position as usize]));
    }
    builder.build()
}

impl Storage for NumericStorage {
    fn size(&self) -> u32 {
        self.len() as u32
    }

    fn value_type(&self) -> ValueType {
        match self {
            NumericStorage::Double(_) => ValueType::Double,
            _ => ValueType::Long,
        }
    }

    fn linear_search(&self, op: FilterOp, value: &ScalarValue, range: Range<u32>) -> BitVector {
        assert!(
            range.end <= self.size(),
            "search range {range:?} exceeds storage of {} elements",
            self.size()
        );
        let len = range.end.saturating_sub(range.start);
        self.search(op, value, range, len)
    }

    fn index_search(&self, op: FilterOp, value: &ScalarValue, indices: &[u32]) -> BitVector {
        self.search(op, value, indices.iter().copied(), indices.len() as u32)
    }
}

impl From<Vec<i32>> for NumericStorage {
    fn from(values: Vec<i32>) -> Self {
        NumericStorage::Int32(values.into())
    }
}

impl From<Vec<u32>> for NumericStorage {
    fn from(values: Vec<u32>) -> Self {
        NumericStorage::UInt32(values.into())
    }
}

impl From<Vec<i64>> for NumericStorage {
    fn from(values: Vec<i64>) -> Self {
        NumericStorage::Int64(values.into())
    }
}

impl From<Vec<f64>> for NumericStorage {
    fn from(values: Vec<f64>) -> Self {
        NumericStorage::Double(values.into())
    }
}
