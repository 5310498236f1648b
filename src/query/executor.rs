//! Constraint evaluation over overlay-stacked columns.
//!
//! Every eligible constraint is answered by one of two strategies:
//!
//! * **bounded**: shrink the row map's covering range through each overlay
//!   down to storage, scan it once, then lift the storage bits back up
//!   through the overlays in reverse;
//! * **indexed**: thread the explicit candidate rows through the overlays,
//!   letting each overlay settle the rows it can decide alone, and look up
//!   only the rest in storage.
//!
//! Both return the same rows. Which one runs is a cost decision made per
//! constraint from the size and density of the current row map.

use colfilter_predicate::{Constraint, FilterOp, ValueType};
use log::Level;

use super::{
    config::{FilterConfig, FilterStrategy},
    error::FilterError,
    index_helper::IndexFilterHelper,
};
use crate::{
    logging::{colfilter_log, LogContext},
    overlay::{
        ArrangementOverlay, ColumnOverlay, NullOverlay, Overlay, OverlayOp, SelectorOverlay,
        StorageBitVector, StorageRange, TableRange,
    },
    row_map::RowMap,
    storage::{NumericStorage, Storage},
    table::{Column, ColumnType, ColumnValues, RowSelection, Table},
};

const FAST_PATH: LogContext = LogContext::new("path=fast");
const LEGACY_PATH: LogContext = LogContext::new("path=legacy");

/// Storage plus its overlay stack, assembled for one constraint.
///
/// `overlays[0]` faces table rows; the last overlay faces `storage`.
pub struct SimpleColumn<'a> {
    /// Overlays ordered outer (table side) to inner (storage side).
    pub overlays: Vec<&'a dyn Overlay>,
    /// Buffer beneath the innermost overlay.
    pub storage: &'a dyn Storage,
}

impl<'a> SimpleColumn<'a> {
    /// Column reading `storage` through `overlays`, outer first.
    #[must_use]
    pub fn new(overlays: Vec<&'a dyn Overlay>, storage: &'a dyn Storage) -> Self {
        Self { overlays, storage }
    }

    /// Column reading `storage` directly.
    #[must_use]
    pub fn bare(storage: &'a dyn Storage) -> Self {
        Self::new(Vec::new(), storage)
    }
}

/// Why a column is answered by the per-row fallback instead of the fast path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyReason {
    /// String, id and placeholder columns have no numeric storage view.
    ColumnType(ColumnType),
    /// Sorted columns have their own binary-search path.
    Sorted,
    /// Dense nullable columns keep value slots for null rows.
    Dense,
    /// The literal's type differs from the column's declared type.
    TypeMismatch {
        /// Type the column declares.
        column: ValueType,
        /// Type of the constraint literal.
        literal: ValueType,
    },
    /// `GLOB` is only meaningful on strings.
    GlobOnNumeric,
    /// Table rows do not correspond one to one with storage positions.
    HasSelector,
}

impl LegacyReason {
    /// Returns a textual representation of the reason.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LegacyReason::ColumnType(_) => "column_type",
            LegacyReason::Sorted => "sorted",
            LegacyReason::Dense => "dense",
            LegacyReason::TypeMismatch { .. } => "type_mismatch",
            LegacyReason::GlobOnNumeric => "glob_on_numeric",
            LegacyReason::HasSelector => "has_selector",
        }
    }
}

/// Applies constraints to row maps.
#[derive(Clone, Debug, Default)]
pub struct QueryExecutor {
    config: FilterConfig,
}

impl QueryExecutor {
    /// Executor using `config`.
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Strategy [`QueryExecutor::filter_column`] would use for `rm`, or
    /// `None` when `rm` is empty.
    #[must_use]
    pub fn choose_strategy(&self, rm: &RowMap) -> Option<FilterStrategy> {
        let span = row_span(rm)?;
        Some(self.config.choose_strategy(rm.size(), span))
    }

    /// Narrows `rm` to the rows of `col` satisfying `c`.
    ///
    /// Returns the strategy that ran, or `None` when `rm` was already empty
    /// (in which case neither storage nor overlays are touched).
    pub fn filter_column(
        &self,
        c: &Constraint,
        col: &SimpleColumn<'_>,
        rm: &mut RowMap,
    ) -> Option<FilterStrategy> {
        let span = row_span(rm)?;
        let rows_in = rm.size();
        let strategy = self.config.choose_strategy(rows_in, span);
        assert!(
            col.overlays.len() <= self.config.max_overlay_count,
            "column has {} overlays, limit is {}",
            col.overlays.len(),
            self.config.max_overlay_count
        );
        colfilter_log!(
            Level::Debug,
            ctx: FAST_PATH,
            "filter_strategy",
            "constraint={} strategy={} size={} span={} density={:.4} overlays={}",
            c,
            strategy,
            rows_in,
            span,
            f64::from(rows_in) / f64::from(span),
            col.overlays.len()
        );

        let used = match strategy {
            FilterStrategy::Indexed => {
                *rm = self.indexed_column_filter(c, col, rm);
                FilterStrategy::Indexed
            }
            FilterStrategy::Bounded => match self.bounded_column_filter(c, col, rm) {
                Some(filtered) => {
                    rm.intersect(&filtered);
                    FilterStrategy::Bounded
                }
                None => {
                    *rm = self.indexed_column_filter(c, col, rm);
                    FilterStrategy::Indexed
                }
            },
        };
        colfilter_log!(
            Level::Trace,
            ctx: FAST_PATH,
            "filter_done",
            "constraint={} strategy={} rows_in={} rows_out={}",
            c,
            used,
            rows_in,
            rm.size()
        );
        Some(used)
    }

    /// Range-scan strategy. Returns the matching rows within the covering
    /// range of `rm` (not yet intersected with `rm`), or `None` when some
    /// overlay cannot map a contiguous range.
    ///
    /// # Panics
    ///
    /// Panics if `rm` is empty.
    #[must_use]
    pub fn bounded_column_filter(
        &self,
        c: &Constraint,
        col: &SimpleColumn<'_>,
        rm: &RowMap,
    ) -> Option<RowMap> {
        let extent = rm.extent().expect("bounded filter on empty row map");
        let mut range = TableRange(extent);
        let mut bounds = Vec::with_capacity(col.overlays.len());
        for overlay in &col.overlays {
            let Some(storage_range) = overlay.map_to_storage_range(&range) else {
                colfilter_log!(
                    Level::Debug,
                    ctx: FAST_PATH,
                    "bounded_rejected",
                    "overlay={} range={:?}",
                    overlay.name(),
                    range.0
                );
                return None;
            };
            bounds.push(range);
            range = TableRange(storage_range.0);
        }

        let bv = col.storage.linear_search(c.op, &c.value, range.0.clone());
        let mut filtered = StorageBitVector {
            range: StorageRange(range.0),
            bv,
        };

        let op = OverlayOp::from(c.op);
        for (overlay, bound) in col.overlays.iter().zip(&bounds).rev() {
            let lifted = overlay.map_to_table_bit_vector(bound, filtered, op);
            filtered = StorageBitVector {
                range: StorageRange(lifted.range.0),
                bv: lifted.bv,
            };
        }
        let offset = filtered.range.0.start;
        Some(RowMap::from_bit_vector(filtered.bv.with_offset(offset)))
    }

    /// Index-lookup strategy. Returns the rows of `rm` satisfying `c`.
    #[must_use]
    pub fn indexed_column_filter(
        &self,
        c: &Constraint,
        col: &SimpleColumn<'_>,
        rm: &RowMap,
    ) -> RowMap {
        let original = rm.size() as usize;
        let mut to_filter = IndexFilterHelper::new(rm.to_index_vec());
        let mut valid: Vec<u32> = Vec::with_capacity(original);
        let mut removed = 0usize;

        let op = OverlayOp::from(c.op);
        for overlay in &col.overlays {
            let current = to_filter.current();
            let lookup = overlay.is_storage_lookup_required(op, &current);

            // Most overlays need storage for every row.
            if lookup.count_set_bits() == lookup.size() {
                to_filter.advance(overlay.map_to_storage_index_vector(&current));
                continue;
            }

            let (mut needs_lookup, mut resolved) = to_filter.partition(&lookup);
            let matched = overlay.index_search(op, &resolved.current());
            removed += resolved.keep_at_set(&matched) as usize;
            valid.extend(resolved.into_global());

            let current = needs_lookup.current();
            needs_lookup.advance(overlay.map_to_storage_index_vector(&current));
            to_filter = needs_lookup;

            assert_eq!(
                removed + valid.len() + to_filter.len(),
                original,
                "overlay {} lost track of candidate rows",
                overlay.name()
            );
        }

        let current = to_filter.current();
        let matched = col.storage.index_search(c.op, &c.value, &current.0);
        removed += to_filter.keep_at_set(&matched) as usize;
        valid.extend(to_filter.into_global());

        assert_eq!(
            original,
            valid.len() + removed,
            "indexed filter lost track of candidate rows"
        );

        // Overlays settle rows in separate passes, so global order interleaves.
        valid.sort_unstable();
        RowMap::from_indices(valid)
    }

    /// Applies `constraints` in order to every row of `table`.
    ///
    /// Numeric columns go through the overlay fast path; everything else is
    /// answered by the column's own per-row filter.
    pub fn filter_legacy(
        &self,
        table: &Table,
        constraints: &[Constraint],
    ) -> Result<RowMap, FilterError> {
        let columns = table.columns();
        if let Some(c) = constraints.iter().find(|c| c.column >= columns.len()) {
            return Err(FilterError::UnknownColumn {
                column: c.column,
                column_count: columns.len(),
            });
        }

        let mut rm = RowMap::full(table.row_count());
        for c in constraints {
            if rm.is_empty() {
                break;
            }
            let column = &columns[c.column];
            match self.fast_path_overlays(column, c) {
                Ok((overlays, storage)) => {
                    let stack = overlays.iter().map(|o| o as &dyn Overlay).collect();
                    let simple = SimpleColumn::new(stack, storage);
                    self.filter_column(c, &simple, &mut rm);
                }
                Err(reason) => {
                    colfilter_log!(
                        Level::Debug,
                        ctx: LEGACY_PATH,
                        "legacy_fallback",
                        "column={} name={} reason={}",
                        c.column,
                        column.name(),
                        reason.as_str()
                    );
                    column.filter_into(c.op, &c.value, &mut rm)?;
                }
            }
        }
        Ok(rm)
    }

    /// Overlay stack (outer first) and storage for answering `c` on `column`
    /// through the fast path, or the reason the column must use the per-row
    /// path.
    #[allow(clippy::type_complexity)]
    pub fn fast_path_overlays<'c>(
        &self,
        column: &'c Column,
        c: &Constraint,
    ) -> Result<(Vec<ColumnOverlay<'c>>, &'c NumericStorage), LegacyReason> {
        let col_type = column.col_type();
        let ColumnValues::Numeric(storage) = column.values() else {
            return Err(LegacyReason::ColumnType(col_type));
        };
        if column.is_sorted() {
            return Err(LegacyReason::Sorted);
        }
        if column.is_dense() {
            return Err(LegacyReason::Dense);
        }
        if c.op == FilterOp::Glob {
            return Err(LegacyReason::GlobOnNumeric);
        }
        let literal = c.value.value_type();
        if !c.op.is_null_check() && literal != col_type.value_type() {
            return Err(LegacyReason::TypeMismatch {
                column: col_type.value_type(),
                literal,
            });
        }

        let mut overlays = Vec::with_capacity(2);
        match column.selection() {
            RowSelection::Identity => {}
            _ if !self.config.selector_overlays => return Err(LegacyReason::HasSelector),
            RowSelection::Selector(selector) => {
                overlays.push(ColumnOverlay::Selector(SelectorOverlay::new(selector)))
            }
            RowSelection::Arrangement(arrangement) => overlays.push(ColumnOverlay::Arrangement(
                ArrangementOverlay::new(arrangement),
            )),
        }
        if let Some(non_null) = column.non_null() {
            overlays.push(ColumnOverlay::Null(NullOverlay::new(non_null)));
        }
        Ok((overlays, storage))
    }
}

/// `last - first` of a non-empty row map.
fn row_span(rm: &RowMap) -> Option<u32> {
    Some(rm.last()? - rm.first()?)
}
