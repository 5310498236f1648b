use thiserror::Error;

/// Errors surfaced by query entry points.
///
/// Only caller-visible conditions appear here. Inconsistencies inside the
/// filter pipeline are bugs and panic instead.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A constraint names a column the table does not have.
    #[error("unknown column #{column}: table has {column_count} columns")]
    UnknownColumn {
        /// Column index named by the constraint.
        column: usize,
        /// Number of columns in the table.
        column_count: usize,
    },
    /// A `GLOB` pattern could not be compiled.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        /// The pattern as written in the constraint.
        pattern: String,
        /// Underlying regex compilation failure.
        #[source]
        source: regex::Error,
    },
}
