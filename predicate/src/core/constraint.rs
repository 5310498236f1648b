use std::fmt;

use super::{FilterOp, ScalarValue};

/// A single `column op literal` predicate.
///
/// Constraints in a list are combined conjunctively, in list order.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// Index of the column within its table.
    pub column: usize,
    /// Operator applied between the column and `value`.
    pub op: FilterOp,
    /// Literal right-hand side. Ignored by null checks.
    pub value: ScalarValue,
}

impl Constraint {
    /// Creates a constraint from its parts.
    #[must_use]
    pub fn new<V>(column: usize, op: FilterOp, value: V) -> Self
    where
        V: Into<ScalarValue>,
    {
        Self {
            column,
            op,
            value: value.into(),
        }
    }

    /// `column = value`.
    #[must_use]
    pub fn eq<V: Into<ScalarValue>>(column: usize, value: V) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    /// `column != value`.
    #[must_use]
    pub fn ne<V: Into<ScalarValue>>(column: usize, value: V) -> Self {
        Self::new(column, FilterOp::Ne, value)
    }

    /// `column < value`.
    #[must_use]
    pub fn lt<V: Into<ScalarValue>>(column: usize, value: V) -> Self {
        Self::new(column, FilterOp::Lt, value)
    }

    /// `column <= value`.
    #[must_use]
    pub fn le<V: Into<ScalarValue>>(column: usize, value: V) -> Self {
        Self::new(column, FilterOp::Le, value)
    }

    /// `column > value`.
    #[must_use]
    pub fn gt<V: Into<ScalarValue>>(column: usize, value: V) -> Self {
        Self::new(column, FilterOp::Gt, value)
    }

    /// `column >= value`.
    #[must_use]
    pub fn ge<V: Into<ScalarValue>>(column: usize, value: V) -> Self {
        Self::new(column, FilterOp::Ge, value)
    }

    /// `column IS NULL`.
    #[must_use]
    pub fn is_null(column: usize) -> Self {
        Self::new(column, FilterOp::IsNull, ScalarValue::Null)
    }

    /// `column IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(column: usize) -> Self {
        Self::new(column, FilterOp::IsNotNull, ScalarValue::Null)
    }

    /// `column GLOB pattern`.
    #[must_use]
    pub fn glob(column: usize, pattern: &str) -> Self {
        Self::new(column, FilterOp::Glob, pattern)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.op.is_null_check() {
            write!(f, "#{} {}", self.column, self.op)
        } else {
            write!(f, "#{} {} {}", self.column, self.op, self.value)
        }
    }
}
