#![deny(missing_docs)]
//! Core predicate structures shared across colfilter layers.

mod constraint;
mod value;

use std::{cmp::Ordering, fmt};

pub use constraint::Constraint;
pub use value::{ScalarValue, ScalarValueRef, ValueType};

/// Operator applied between a column and a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Equals (`=`).
    Eq,
    /// Not equals (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal to (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal to (`>=`).
    Ge,
    /// `IS NULL`; the literal is ignored.
    IsNull,
    /// `IS NOT NULL`; the literal is ignored.
    IsNotNull,
    /// Shell-style pattern match on strings (`GLOB`).
    Glob,
}

impl FilterOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::IsNull => "IS NULL",
            FilterOp::IsNotNull => "IS NOT NULL",
            FilterOp::Glob => "GLOB",
        }
    }

    /// Returns true for `IS NULL` / `IS NOT NULL`, whose literal carries no meaning.
    #[must_use]
    pub fn is_null_check(self) -> bool {
        matches!(self, FilterOp::IsNull | FilterOp::IsNotNull)
    }

    /// Evaluates an ordered comparison given `column_value.cmp(literal)`.
    ///
    /// `None` means the operands were unordered (for example a NaN double):
    /// only `!=` holds in that case. Null checks and `GLOB` never hold here;
    /// callers evaluate them separately.
    #[must_use]
    pub fn test_ordering(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return self == FilterOp::Ne;
        };
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Ne => ordering != Ordering::Equal,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Le => ordering != Ordering::Greater,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Ge => ordering != Ordering::Less,
            FilterOp::IsNull | FilterOp::IsNotNull | FilterOp::Glob => false,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
