//! Column container the executor filters.
//!
//! A [`Table`] is an ordered set of equally long [`Column`]s. Columns carry
//! the flags the executor inspects to decide between the overlay fast path
//! and the per-row path implemented in this module.

mod column;
mod error;
mod legacy;

use arrow::record_batch::RecordBatch;

pub use column::{Column, ColumnType, ColumnValues, RowSelection};
pub use error::TableError;

/// Ordered columns sharing one row count.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: u32,
}

impl Table {
    /// Starts building a table.
    #[must_use]
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Table with one column per field of `batch`.
    pub fn try_from_record_batch(batch: &RecordBatch) -> Result<Self, TableError> {
        let schema = batch.schema();
        let mut builder = Table::builder();
        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let column = Column::try_from_arrow(field.name().as_str(), array.as_ref())?;
            builder = builder.column(column);
        }
        builder.build()
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at `index`, if any.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Index of the column called `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name() == name)
    }

    /// Number of rows every column exposes.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }
}

/// Builder validating that columns agree on their row count.
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Builds the table.
    pub fn build(self) -> Result<Table, TableError> {
        let row_count = self.columns.first().map_or(0, Column::row_count);
        if let Some(column) = self
            .columns
            .iter()
            .find(|column| column.row_count() != row_count)
        {
            return Err(TableError::LengthMismatch {
                column: column.name().to_owned(),
                expected: row_count,
                actual: column.row_count(),
            });
        }
        Ok(Table {
            columns: self.columns,
            row_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{ArrayRef, Float64Array, Int32Array, StringArray},
        datatypes::{DataType, Field, Schema},
    };

    use super::*;
    use crate::bit_vector::BitVector;

    #[test]
    fn builder_rejects_uneven_columns() {
        let err = Table::builder()
            .column(Column::numeric("a", vec![1i64, 2, 3]))
            .column(Column::id("b", 2))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn row_count_follows_selection() {
        let table = Table::builder()
            .column(
                Column::numeric("a", vec![1i64, 2, 3, 4])
                    .with_selector(BitVector::from_set_positions(4, [0, 3]))
                    .unwrap(),
            )
            .column(Column::dummy("b", 2))
            .build()
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_index("b"), Some(1));
        assert!(table.column(2).is_none());
    }

    #[test]
    fn record_batches_become_tables() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("i", DataType::Int32, true),
            Field::new("d", DataType::Float64, false),
            Field::new("s", DataType::Utf8, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(vec![Some(1), None])),
            Arc::new(Float64Array::from(vec![0.5, 1.5])),
            Arc::new(StringArray::from(vec!["x", "y"])),
        ];
        let batch = RecordBatch::try_new(schema, columns).unwrap();
        let table = Table::try_from_record_batch(&batch).unwrap();
        assert_eq!(table.row_count(), 2);
        let types: Vec<_> = table.columns().iter().map(Column::col_type).collect();
        assert_eq!(
            types,
            vec![ColumnType::Int32, ColumnType::Double, ColumnType::String]
        );
        assert!(table.columns()[0].non_null().is_some());
        assert!(table.columns()[1].non_null().is_none());
    }

    #[test]
    fn empty_table_has_no_rows() {
        let table = Table::builder().build().unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.columns().is_empty());
    }
}
