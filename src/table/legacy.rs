//! Per-row filtering on logical column values.
//!
//! This is the path for every column the overlay executor does not handle.
//! It reads one logical value per candidate row and applies SQL semantics:
//! `NULL` only satisfies `IS NULL`, and numeric operands of different width
//! compare as doubles.

use std::{cmp::Ordering, ops::Range};

use colfilter_predicate::{FilterOp, ScalarValue, ScalarValueRef, ValueType};
use regex::Regex;

use super::column::{Column, RowSelection};
use crate::{query::FilterError, row_map::RowMap};

/// Predicate on a single logical value.
enum RowPredicate<'a> {
    IsNull,
    IsNotNull,
    Glob(Option<Regex>),
    Compare(FilterOp, ScalarValueRef<'a>),
    Nothing,
}

impl<'a> RowPredicate<'a> {
    fn new(op: FilterOp, value: &'a ScalarValue) -> Result<Self, FilterError> {
        Ok(match op {
            FilterOp::IsNull => RowPredicate::IsNull,
            FilterOp::IsNotNull => RowPredicate::IsNotNull,
            FilterOp::Glob => match value {
                ScalarValue::String(pattern) => {
                    let regex = Regex::new(&glob_to_regex(pattern)).map_err(|source| {
                        FilterError::InvalidGlob {
                            pattern: pattern.clone(),
                            source,
                        }
                    })?;
                    RowPredicate::Glob(Some(regex))
                }
                _ => RowPredicate::Glob(None),
            },
            _ if value.is_null() => RowPredicate::Nothing,
            _ => RowPredicate::Compare(op, value.as_ref()),
        })
    }

    fn matches(&self, value: ScalarValueRef<'_>) -> bool {
        match self {
            RowPredicate::IsNull => value.is_null(),
            RowPredicate::IsNotNull => !value.is_null(),
            RowPredicate::Glob(regex) => match (regex, value.as_str()) {
                (Some(regex), Some(text)) => regex.is_match(text),
                _ => false,
            },
            RowPredicate::Compare(op, literal) => {
                !value.is_null() && op.test_ordering(value.compare(*literal))
            }
            RowPredicate::Nothing => false,
        }
    }
}

impl Column {
    /// Narrows `rm` to the rows whose value satisfies `op value`.
    ///
    /// Sorted columns without nulls or a row selection answer `=`, `<`,
    /// `<=`, `>` and `>=` by binary search; everything else is evaluated row
    /// by row.
    pub fn filter_into(
        &self,
        op: FilterOp,
        value: &ScalarValue,
        rm: &mut RowMap,
    ) -> Result<(), FilterError> {
        if let Some(range) = self.sorted_range(op, value) {
            rm.intersect(&RowMap::from_range(range));
            return Ok(());
        }
        let predicate = RowPredicate::new(op, value)?;
        let kept = rm
            .iter()
            .filter(|&row| predicate.matches(self.value_ref(row)))
            .collect();
        *rm = RowMap::from_indices(kept);
        Ok(())
    }

    /// Rows satisfying `op value` when the column supports binary search.
    fn sorted_range(&self, op: FilterOp, value: &ScalarValue) -> Option<Range<u32>> {
        if !self.is_sorted()
            || self.has_nulls()
            || self.selection() != &RowSelection::Identity
            || !matches!(
                op,
                FilterOp::Eq | FilterOp::Lt | FilterOp::Le | FilterOp::Gt | FilterOp::Ge
            )
        {
            return None;
        }
        let literal = value.as_ref();
        let comparable = match (self.col_type().value_type(), literal) {
            (ValueType::Long | ValueType::Double, ScalarValueRef::Long(_)) => true,
            (ValueType::Long | ValueType::Double, ScalarValueRef::Double(v)) => !v.is_nan(),
            (ValueType::String, ScalarValueRef::String(_)) => true,
            _ => false,
        };
        if !comparable {
            return None;
        }

        let rows = self.row_count();
        let ordering = |row: u32| self.value_ref(row).compare(literal);
        let lower = partition_point(rows, |row| ordering(row) == Some(Ordering::Less));
        let upper = partition_point(rows, |row| {
            matches!(ordering(row), Some(Ordering::Less | Ordering::Equal))
        });
        Some(match op {
            FilterOp::Eq => lower..upper,
            FilterOp::Lt => 0..lower,
            FilterOp::Le => 0..upper,
            FilterOp::Gt => upper..rows,
            FilterOp::Ge => lower..rows,
            _ => unreachable!("checked above"),
        })
    }
}

/// First row in `[0, rows)` for which `pred` is false, given `pred` holds
/// on a prefix.
fn partition_point(rows: u32, pred: impl Fn(u32) -> bool) -> u32 {
    let (mut lo, mut hi) = (0, rows);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Translates a `GLOB` pattern into an anchored regular expression.
///
/// `*` matches any run of characters, `?` exactly one, and `[...]` a
/// character class (`[^...]` negated). Everything else is literal.
pub(crate) fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('^');
                }
                // A leading ']' is literal.
                if chars.peek() == Some(&']') {
                    chars.next();
                    out.push_str("\\]");
                }
                for ch in chars.by_ref() {
                    match ch {
                        ']' => {
                            out.push(']');
                            break;
                        }
                        '\\' | '[' | '&' | '~' => {
                            out.push('\\');
                            out.push(ch);
                        }
                        _ => out.push(ch),
                    }
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
            }
        }
    }
    out.push('$');
    out
}
