use std::cmp::Ordering;

use arrow::{
    array::{Array, AsArray, StringArray},
    datatypes::{DataType, Float64Type, Int32Type, Int64Type, UInt32Type},
};
use colfilter_predicate::{ScalarValueRef, ValueType};

use super::error::TableError;
use crate::{
    bit_vector::BitVector,
    storage::{NumericStorage, Storage},
};

/// Declared logical type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 32-bit signed integers.
    Int32,
    /// 32-bit unsigned integers.
    UInt32,
    /// 64-bit signed integers.
    Int64,
    /// 64-bit floats.
    Double,
    /// UTF-8 strings.
    String,
    /// Row identifiers: the value of each position is the position itself.
    Id,
    /// Placeholder column with no values; every row is `NULL`.
    Dummy,
}

impl ColumnType {
    /// Type literals must have to be compared with this column's values.
    #[must_use]
    pub fn value_type(self) -> ValueType {
        match self {
            ColumnType::Int32 | ColumnType::UInt32 | ColumnType::Int64 | ColumnType::Id => {
                ValueType::Long
            }
            ColumnType::Double => ValueType::Double,
            ColumnType::String => ValueType::String,
            ColumnType::Dummy => ValueType::Null,
        }
    }
}

/// Backing values of a column.
#[derive(Clone, Debug)]
pub enum ColumnValues {
    /// Numeric buffer; sparse or dense depending on the column's layout.
    Numeric(NumericStorage),
    /// Strings with their own Arrow null bitmap.
    String(StringArray),
    /// Values are implied by position.
    Id,
    /// No values.
    Dummy,
}

/// How table rows pick positions of a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowSelection {
    /// Row `i` is position `i`.
    Identity,
    /// Row `i` is the `i`-th set position of the bitmap.
    Selector(BitVector),
    /// Row `i` is position `arrangement[i]`; any order, repeats allowed.
    Arrangement(Vec<u32>),
}

/// One column of a [`Table`](super::Table).
///
/// A column holds `len` logical positions. Nullable numeric columns come in
/// two layouts: sparse (storage holds only the non-null values) and dense
/// (storage keeps a slot for every position). Table rows reach positions
/// through the column's [`RowSelection`].
#[derive(Clone, Debug)]
pub struct Column {
    name: String,
    col_type: ColumnType,
    values: ColumnValues,
    non_null: Option<BitVector>,
    dense: bool,
    sorted: bool,
    selection: RowSelection,
    len: u32,
}

impl Column {
    fn with_values(name: String, col_type: ColumnType, values: ColumnValues, len: u32) -> Self {
        Self {
            name,
            col_type,
            values,
            non_null: None,
            dense: false,
            sorted: false,
            selection: RowSelection::Identity,
            len,
        }
    }

    /// Non-null numeric column.
    pub fn numeric(name: impl Into<String>, storage: impl Into<NumericStorage>) -> Self {
        let storage = storage.into();
        let len = storage.size();
        let col_type = numeric_type(&storage);
        Self::with_values(name.into(), col_type, ColumnValues::Numeric(storage), len)
    }

    /// Nullable numeric column storing only the non-null values, in order.
    pub fn sparse_nullable(
        name: impl Into<String>,
        storage: impl Into<NumericStorage>,
        non_null: BitVector,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let storage = storage.into();
        let stored = storage.size();
        if stored != non_null.count_set_bits() {
            return Err(TableError::SparseValueCount {
                column: name,
                expected: non_null.count_set_bits(),
                actual: stored,
            });
        }
        let col_type = numeric_type(&storage);
        let mut column = Self::with_values(
            name,
            col_type,
            ColumnValues::Numeric(storage),
            non_null.size(),
        );
        column.non_null = Some(non_null);
        Ok(column)
    }

    /// Nullable numeric column keeping a value slot for null positions too.
    pub fn dense_nullable(
        name: impl Into<String>,
        storage: impl Into<NumericStorage>,
        non_null: BitVector,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let storage = storage.into();
        let stored = storage.size();
        if stored != non_null.size() {
            return Err(TableError::NullBitmapSize {
                column: name,
                expected: stored,
                actual: non_null.size(),
            });
        }
        let col_type = numeric_type(&storage);
        let mut column = Self::with_values(name, col_type, ColumnValues::Numeric(storage), stored);
        column.non_null = Some(non_null);
        column.dense = true;
        Ok(column)
    }

    /// String column; Arrow nulls are the column's nulls.
    pub fn string(name: impl Into<String>, values: StringArray) -> Self {
        let len = values.len() as u32;
        Self::with_values(name.into(), ColumnType::String, ColumnValues::String(values), len)
    }

    /// Identifier column of `len` positions. Always sorted.
    pub fn id(name: impl Into<String>, len: u32) -> Self {
        let mut column = Self::with_values(name.into(), ColumnType::Id, ColumnValues::Id, len);
        column.sorted = true;
        column
    }

    /// Placeholder column of `len` positions.
    pub fn dummy(name: impl Into<String>, len: u32) -> Self {
        Self::with_values(name.into(), ColumnType::Dummy, ColumnValues::Dummy, len)
    }

    /// Column from an Arrow array. Nullable arrays become sparse nullable
    /// columns.
    pub fn try_from_arrow(name: impl Into<String>, array: &dyn Array) -> Result<Self, TableError> {
        let name = name.into();
        let storage = match array.data_type() {
            DataType::Int32 => NumericStorage::Int32(NumericStorage::non_null_values(
                array.as_primitive::<Int32Type>(),
            )),
            DataType::UInt32 => NumericStorage::UInt32(NumericStorage::non_null_values(
                array.as_primitive::<UInt32Type>(),
            )),
            DataType::Int64 => NumericStorage::Int64(NumericStorage::non_null_values(
                array.as_primitive::<Int64Type>(),
            )),
            DataType::Float64 => NumericStorage::Double(NumericStorage::non_null_values(
                array.as_primitive::<Float64Type>(),
            )),
            DataType::Utf8 => return Ok(Self::string(name, array.as_string::<i32>().clone())),
            other => {
                return Err(TableError::UnsupportedType {
                    column: name,
                    data_type: other.clone(),
                })
            }
        };
        match array.nulls() {
            Some(nulls) if nulls.null_count() > 0 => {
                Self::sparse_nullable(name, storage, BitVector::from(nulls.inner()))
            }
            _ => Ok(Self::numeric(name, storage)),
        }
    }

    /// Marks the column as sorted: ascending by position, nulls first.
    pub fn sorted(mut self) -> Result<Self, TableError> {
        if let Some(position) = self.first_unsorted_position() {
            return Err(TableError::NotSorted {
                column: self.name,
                position,
            });
        }
        self.sorted = true;
        Ok(self)
    }

    fn first_unsorted_position(&self) -> Option<u32> {
        if self.len == 0 {
            return None;
        }
        let mut prev = self.value_at_position(0);
        for position in 1..self.len {
            let value = self.value_at_position(position);
            let ascending = match (prev.is_null(), value.is_null()) {
                (_, true) => prev.is_null(),
                (true, false) => true,
                (false, false) => {
                    matches!(prev.compare(value), Some(Ordering::Less | Ordering::Equal))
                }
            };
            if !ascending {
                return Some(position);
            }
            prev = value;
        }
        None
    }

    /// Exposes only the positions set in `selector`, in position order.
    pub fn with_selector(mut self, selector: BitVector) -> Result<Self, TableError> {
        if selector.size() != self.len {
            return Err(TableError::SelectorSize {
                column: self.name,
                expected: self.len,
                actual: selector.size(),
            });
        }
        self.selection = RowSelection::Selector(selector);
        Ok(self)
    }

    /// Exposes positions in the order given by `arrangement`.
    pub fn with_arrangement(mut self, arrangement: Vec<u32>) -> Result<Self, TableError> {
        if let Some(&position) = arrangement.iter().find(|&&position| position >= self.len) {
            return Err(TableError::SelectorOutOfRange {
                column: self.name,
                position,
                len: self.len,
            });
        }
        self.selection = RowSelection::Arrangement(arrangement);
        Ok(self)
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub fn col_type(&self) -> ColumnType {
        self.col_type
    }

    /// Backing values.
    #[must_use]
    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    /// Non-null bitmap over positions, for nullable numeric columns.
    #[must_use]
    pub fn non_null(&self) -> Option<&BitVector> {
        self.non_null.as_ref()
    }

    /// Whether storage keeps slots for null positions.
    #[must_use]
    pub fn is_dense(&self) -> bool {
        self.dense
    }

    /// Whether positions are in ascending value order.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// How table rows map to positions.
    #[must_use]
    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    /// Whether table rows differ from positions.
    #[must_use]
    pub fn has_selector(&self) -> bool {
        self.selection != RowSelection::Identity
    }

    /// Number of logical positions.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the column holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of table rows the column exposes.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        match &self.selection {
            RowSelection::Identity => self.len,
            RowSelection::Selector(selector) => selector.count_set_bits(),
            RowSelection::Arrangement(arrangement) => arrangement.len() as u32,
        }
    }

    /// Whether any row of the column is `NULL`.
    pub(crate) fn has_nulls(&self) -> bool {
        match &self.values {
            ColumnValues::Numeric(_) => self
                .non_null
                .as_ref()
                .is_some_and(|bv| bv.count_set_bits() < bv.size()),
            ColumnValues::String(values) => values.null_count() > 0,
            ColumnValues::Id => false,
            ColumnValues::Dummy => self.len > 0,
        }
    }

    /// Logical value of table row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not below [`Column::row_count`].
    #[must_use]
    pub fn value_ref(&self, row: u32) -> ScalarValueRef<'_> {
        let position = match &self.selection {
            RowSelection::Identity => row,
            RowSelection::Selector(selector) => selector.index_of_nth_set(row),
            RowSelection::Arrangement(arrangement) => arrangement[row as usize],
        };
        self.value_at_position(position)
    }

    fn value_at_position(&self, position: u32) -> ScalarValueRef<'_> {
        match &self.values {
            ColumnValues::Numeric(storage) => {
                let index = match &self.non_null {
                    None => position,
                    Some(non_null) if !non_null.is_set(position) => return ScalarValueRef::Null,
                    Some(_) if self.dense => position,
                    Some(non_null) => non_null.count_set_bits_until(position),
                };
                storage.value_at(index)
            }
            ColumnValues::String(values) => {
                if values.is_null(position as usize) {
                    ScalarValueRef::Null
                } else {
                    ScalarValueRef::String(values.value(position as usize))
                }
            }
            ColumnValues::Id => ScalarValueRef::Long(i64::from(position)),
            ColumnValues::Dummy => ScalarValueRef::Null,
        }
    }
}

fn numeric_type(storage: &NumericStorage) -> ColumnType {
    match storage {
        NumericStorage::Int32(_) => ColumnType::Int32,
        NumericStorage::UInt32(_) => ColumnType::UInt32,
        NumericStorage::Int64(_) => ColumnType::Int64,
        NumericStorage::Double(_) => ColumnType::Double,
    }
}
