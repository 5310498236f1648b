mod common;

use std::collections::HashSet;

use colfilter::{
    overlay::Overlay,
    query::{
        Constraint, FilterConfig, FilterOp, FilterStrategy, QueryExecutor, ScalarValue,
        SimpleColumn, StrategyPolicy,
    },
    table::ColumnType,
    BitVector, Column, RowMap,
};
use common::{
    is_strictly_ascending, random_column, random_constraint, random_row_map, reference_filter,
};

const ROUNDS: usize = 300;

fn executor(policy: StrategyPolicy) -> QueryExecutor {
    QueryExecutor::new(
        FilterConfig::default()
            .policy(policy)
            .selector_overlays(true),
    )
}

/// Runs `f` with the column's overlay stack assembled as the executor would.
fn with_simple_column<R>(
    column: &Column,
    c: &Constraint,
    f: impl FnOnce(&SimpleColumn<'_>) -> R,
) -> R {
    let (overlays, storage) = executor(StrategyPolicy::Auto)
        .fast_path_overlays(column, c)
        .expect("random columns are eligible");
    let stack = overlays.iter().map(|o| o as &dyn Overlay).collect();
    f(&SimpleColumn::new(stack, storage))
}

#[test]
fn bounded_and_indexed_agree_with_reference() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_f11e);
    for round in 0..ROUNDS {
        let column = random_column(&mut rng);
        let rm = random_row_map(&mut rng, column.row_count());
        let c = random_constraint(&mut rng, &column);
        let expected = reference_filter(&column, &c, &rm);

        with_simple_column(&column, &c, |simple| {
            for policy in [StrategyPolicy::Bounded, StrategyPolicy::Indexed] {
                let mut out = rm.clone();
                executor(policy).filter_column(&c, simple, &mut out);
                assert_eq!(
                    out.to_index_vec(),
                    expected,
                    "round {round}: {c} with {policy:?} over {rm:?}"
                );
            }
        });
    }
}

#[test]
fn fast_path_matches_per_row_filter() {
    let mut rng = fastrand::Rng::with_seed(42);
    for round in 0..ROUNDS {
        let column = random_column(&mut rng);
        let rm = random_row_map(&mut rng, column.row_count());
        let c = random_constraint(&mut rng, &column);

        let mut legacy = rm.clone();
        column
            .filter_into(c.op, &c.value, &mut legacy)
            .expect("per-row filter");
        let mut fast = rm.clone();
        with_simple_column(&column, &c, |simple| {
            executor(StrategyPolicy::Auto).filter_column(&c, simple, &mut fast)
        });
        assert_eq!(fast, legacy, "round {round}: {c}");
    }
}

#[test]
fn filtering_is_idempotent_and_narrowing() {
    let mut rng = fastrand::Rng::with_seed(7);
    for round in 0..ROUNDS {
        let column = random_column(&mut rng);
        let rm = random_row_map(&mut rng, column.row_count());
        let c = random_constraint(&mut rng, &column);

        with_simple_column(&column, &c, |simple| {
            let executor = executor(StrategyPolicy::Auto);
            let mut once = rm.clone();
            executor.filter_column(&c, simple, &mut once);
            assert!(
                once.iter().all(|row| rm.contains(row)),
                "round {round}: output escapes input"
            );

            let mut twice = once.clone();
            executor.filter_column(&c, simple, &mut twice);
            assert_eq!(twice, once, "round {round}: {c} is not idempotent");
        });
    }
}

#[test]
fn indexed_results_are_sorted_and_unique() {
    let mut rng = fastrand::Rng::with_seed(1234);
    for _ in 0..ROUNDS {
        let column = random_column(&mut rng);
        let rm = random_row_map(&mut rng, column.row_count());
        if rm.is_empty() {
            continue;
        }
        let c = random_constraint(&mut rng, &column);
        let out = with_simple_column(&column, &c, |simple| {
            executor(StrategyPolicy::Auto).indexed_column_filter(&c, simple, &rm)
        });
        assert!(is_strictly_ascending(&out.to_index_vec()));
    }
}

#[test]
fn every_storage_type_and_nan_is_covered() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_f11e);
    let mut seen = HashSet::new();
    let mut nan_literals = 0;
    for _ in 0..2_000 {
        let column = random_column(&mut rng);
        let c = random_constraint(&mut rng, &column);
        seen.insert(column.col_type());
        if matches!(c.value, ScalarValue::Double(v) if v.is_nan()) {
            nan_literals += 1;
        }
    }
    assert_eq!(
        seen,
        HashSet::from([
            ColumnType::Int32,
            ColumnType::UInt32,
            ColumnType::Int64,
            ColumnType::Double,
        ])
    );
    assert!(nan_literals > 0);
}

#[test]
fn nan_only_satisfies_not_equal() {
    let column = Column::sparse_nullable(
        "c",
        vec![f64::NAN, 1.0, f64::NAN],
        BitVector::from_set_positions(4, [0, 1, 3]),
    )
    .unwrap();
    let rm = RowMap::full(4);
    for (op, expected) in [
        (FilterOp::Eq, Vec::<u32>::new()),
        (FilterOp::Lt, Vec::new()),
        (FilterOp::Ge, Vec::new()),
        (FilterOp::Ne, vec![0, 1, 3]),
    ] {
        let c = Constraint::new(0, op, ScalarValue::Double(f64::NAN));
        with_simple_column(&column, &c, |simple| {
            for policy in [StrategyPolicy::Bounded, StrategyPolicy::Indexed] {
                let mut out = rm.clone();
                executor(policy).filter_column(&c, simple, &mut out);
                assert_eq!(out.to_index_vec(), expected, "{c} with {policy:?}");
            }
        });
        assert_eq!(reference_filter(&column, &c, &rm), expected, "{c}");
    }
}

#[test]
fn strategy_follows_density() {
    let mut rng = fastrand::Rng::with_seed(99);
    let executor = QueryExecutor::default();
    for _ in 0..ROUNDS {
        let rows = rng.u32(2..5_000);
        let rm = random_row_map(&mut rng, rows);
        let (Some(first), Some(last)) = (rm.first(), rm.last()) else {
            assert_eq!(executor.choose_strategy(&rm), None);
            continue;
        };
        let size = rm.size();
        let span = last - first;
        let sparse = size < 1024 && f64::from(size) / f64::from(span) < 0.5;
        let expected = if sparse {
            FilterStrategy::Indexed
        } else {
            FilterStrategy::Bounded
        };
        assert_eq!(executor.choose_strategy(&rm), Some(expected));
    }
}
