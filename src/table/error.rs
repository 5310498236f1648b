use arrow::datatypes::DataType;
use thiserror::Error;

/// Errors raised while assembling columns and tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// A column's row count differs from the table's.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column.
        column: String,
        /// Row count of the first column.
        expected: u32,
        /// Row count of the offending column.
        actual: u32,
    },
    /// A dense null bitmap does not cover every stored value.
    #[error("column '{column}' null bitmap has {actual} bits, expected {expected}")]
    NullBitmapSize {
        /// Offending column.
        column: String,
        /// Number of stored values.
        expected: u32,
        /// Bits in the bitmap.
        actual: u32,
    },
    /// Sparse storage must hold exactly one value per non-null row.
    #[error("column '{column}' stores {actual} values for {expected} non-null rows")]
    SparseValueCount {
        /// Offending column.
        column: String,
        /// Set bits in the null bitmap.
        expected: u32,
        /// Number of stored values.
        actual: u32,
    },
    /// A selector bitmap does not cover every stored position.
    #[error("column '{column}' selector has {actual} bits, expected {expected}")]
    SelectorSize {
        /// Offending column.
        column: String,
        /// Number of positions the column holds.
        expected: u32,
        /// Bits in the selector.
        actual: u32,
    },
    /// An arrangement names a position past the end of the column.
    #[error("column '{column}' arrangement selects position {position} of {len}")]
    SelectorOutOfRange {
        /// Offending column.
        column: String,
        /// First out-of-range position.
        position: u32,
        /// Number of positions the column holds.
        len: u32,
    },
    /// A column flagged as sorted is not ascending.
    #[error("column '{column}' is not sorted at position {position}")]
    NotSorted {
        /// Offending column.
        column: String,
        /// First position whose value is smaller than its predecessor.
        position: u32,
    },
    /// The Arrow array type has no column counterpart.
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedType {
        /// Offending column.
        column: String,
        /// Arrow type of the array.
        data_type: DataType,
    },
}
