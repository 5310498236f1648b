use std::{cmp::Ordering, fmt};

/// SQL-level type of a literal or of a column's logical values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The `NULL` literal.
    Null,
    /// Any integer width, widened to `i64`.
    Long,
    /// 64-bit floating point.
    Double,
    /// UTF-8 string.
    String,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::String => "string",
        };
        f.write_str(name)
    }
}

/// Literal values accepted on the right-hand side of a constraint.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// Represents SQL `NULL`.
    Null,
    /// Signed 64-bit integer.
    Long(i64),
    /// 64-bit floating point.
    Double(f64),
    /// UTF-8 string.
    String(String),
}

impl ScalarValue {
    /// Represents SQL `NULL`.
    #[must_use]
    pub fn null() -> Self {
        ScalarValue::Null
    }

    /// Returns true when the literal is `NULL`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Type tag of this literal.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.as_ref().value_type()
    }

    /// Returns a borrowed view over this scalar value.
    #[must_use]
    pub fn as_ref(&self) -> ScalarValueRef<'_> {
        match self {
            ScalarValue::Null => ScalarValueRef::Null,
            ScalarValue::Long(value) => ScalarValueRef::Long(*value),
            ScalarValue::Double(value) => ScalarValueRef::Double(*value),
            ScalarValue::String(value) => ScalarValueRef::String(value.as_str()),
        }
    }

    /// Compares this scalar with another, returning the ordering when both sides are comparable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        self.as_ref().compare(other.as_ref())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Long(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Long(i64::from(value))
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::Long(i64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Double(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_owned())
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("NULL"),
            ScalarValue::Long(value) => write!(f, "{value}"),
            ScalarValue::Double(value) => write!(f, "{value}"),
            ScalarValue::String(value) => write!(f, "'{value}'"),
        }
    }
}

/// Borrowed view over a scalar value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValueRef<'a> {
    /// Represents SQL `NULL`.
    Null,
    /// Signed 64-bit integer.
    Long(i64),
    /// 64-bit floating point.
    Double(f64),
    /// UTF-8 string slice.
    String(&'a str),
}

impl<'a> ScalarValueRef<'a> {
    /// Returns true when the value is `NULL`.
    #[must_use]
    pub fn is_null(self) -> bool {
        matches!(self, ScalarValueRef::Null)
    }

    /// Type tag of this value.
    #[must_use]
    pub fn value_type(self) -> ValueType {
        match self {
            ScalarValueRef::Null => ValueType::Null,
            ScalarValueRef::Long(_) => ValueType::Long,
            ScalarValueRef::Double(_) => ValueType::Double,
            ScalarValueRef::String(_) => ValueType::String,
        }
    }

    /// Returns the value as `f64` when it is numeric; integers are widened.
    #[must_use]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            ScalarValueRef::Long(value) => Some(value as f64),
            ScalarValueRef::Double(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as a string slice when it is a string.
    #[must_use]
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            ScalarValueRef::String(value) => Some(value),
            _ => None,
        }
    }

    /// Compares this scalar with another, returning the ordering when both sides are comparable.
    ///
    /// Mixed integer/double operands compare as doubles. `NULL` and
    /// string-vs-number pairs are incomparable.
    pub fn compare(self, other: ScalarValueRef<'_>) -> Option<Ordering> {
        use ScalarValueRef::*;
        match (self, other) {
            (Null, _) | (_, Null) => None,
            (Long(lhs), Long(rhs)) => Some(lhs.cmp(&rhs)),
            (String(lhs), String(rhs)) => Some(lhs.cmp(rhs)),
            (lhs, rhs) => match (lhs.as_f64(), rhs.as_f64()) {
                (Some(lhs), Some(rhs)) => lhs.partial_cmp(&rhs),
                _ => None,
            },
        }
    }
}

impl<'a> From<&'a ScalarValue> for ScalarValueRef<'a> {
    fn from(value: &'a ScalarValue) -> Self {
        value.as_ref()
    }
}
