//! Constraint evaluation for the filter path.
//!
//! This module owns the executor that narrows a [`RowMap`](crate::row_map::RowMap)
//! constraint by constraint. It re-exports the `predicate` crate's surface so
//! callers can build constraints without depending on it directly.

mod config;
mod error;
mod executor;
mod index_helper;

pub use colfilter_predicate::{Constraint, FilterOp, ScalarValue, ScalarValueRef, ValueType};
pub use config::{FilterConfig, FilterStrategy, StrategyPolicy};
pub use error::FilterError;
pub use executor::{LegacyReason, QueryExecutor, SimpleColumn};
pub use index_helper::IndexFilterHelper;
