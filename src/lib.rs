#![deny(missing_docs)]
//! Arrow-backed, in-memory column filtering.
//!
//! Columns are raw typed storage beneath a stack of overlays (null handling,
//! row selection, reordering). A [`QueryExecutor`] narrows a [`RowMap`] one
//! constraint at a time without materializing column values. For every
//! constraint it picks between a range scan and an index lookup from the
//! density of the candidate rows.
//!
//! ```
//! use colfilter::{
//!     query::{Constraint, QueryExecutor},
//!     table::{Column, Table},
//! };
//!
//! let table = Table::builder()
//!     .column(Column::numeric("ts", vec![5i64, 1, 9, 3, 5]))
//!     .build()
//!     .unwrap();
//! let rows = QueryExecutor::default()
//!     .filter_legacy(&table, &[Constraint::ge(0, 5i64)])
//!     .unwrap();
//! assert_eq!(rows.to_index_vec(), vec![0, 2, 4]);
//! ```

pub mod bit_vector;
pub mod overlay;
pub mod query;
pub mod row_map;
pub mod storage;
pub mod table;

mod logging;

pub use crate::{
    bit_vector::BitVector,
    query::{FilterConfig, FilterError, QueryExecutor},
    row_map::RowMap,
    table::{Column, Table, TableError},
};
