#![allow(dead_code)]

use colfilter::{
    query::{Constraint, FilterOp, ScalarValue, ValueType},
    storage::NumericStorage,
    BitVector, Column, RowMap,
};

pub const OPS: [FilterOp; 8] = [
    FilterOp::Eq,
    FilterOp::Ne,
    FilterOp::Lt,
    FilterOp::Le,
    FilterOp::Gt,
    FilterOp::Ge,
    FilterOp::IsNull,
    FilterOp::IsNotNull,
];

/// Random numeric column of a random storage type: optionally sparse
/// nullable, optionally behind a selector or an arrangement. Double columns
/// may hold NaN.
pub fn random_column(rng: &mut fastrand::Rng) -> Column {
    let len = rng.u32(1..600);
    let nullable = rng.bool();
    let non_null: BitVector = (0..len).map(|_| !nullable || rng.u8(0..10) < 7).collect();
    let values = random_storage(rng, non_null.count_set_bits());
    let column = if nullable {
        Column::sparse_nullable("c", values, non_null).expect("sparse column")
    } else {
        Column::numeric("c", values)
    };
    match rng.u8(0..3) {
        0 => column,
        1 => {
            let selector: BitVector = (0..len).map(|_| rng.u8(0..10) < 6).collect();
            column.with_selector(selector).expect("selector")
        }
        _ => {
            let rows = rng.u32(1..600);
            let arrangement = (0..rows).map(|_| rng.u32(0..len)).collect();
            column.with_arrangement(arrangement).expect("arrangement")
        }
    }
}

/// Random candidate set over `[0, rows)` in a random representation.
pub fn random_row_map(rng: &mut fastrand::Rng, rows: u32) -> RowMap {
    if rows == 0 {
        return RowMap::full(0);
    }
    match rng.u8(0..4) {
        0 => RowMap::full(rows),
        1 => {
            let start = rng.u32(0..rows);
            let end = rng.u32(start..=rows);
            RowMap::from_range(start..end)
        }
        2 => {
            let keep = rng.u8(1..10);
            RowMap::from_bit_vector((0..rows).map(|_| rng.u8(0..10) < keep).collect())
        }
        _ => {
            // Sparse: a handful of rows spread over the whole span.
            let indices = (0..rows).filter(|_| rng.u8(0..20) == 0).collect();
            RowMap::from_indices(indices)
        }
    }
}

fn random_storage(rng: &mut fastrand::Rng, count: u32) -> NumericStorage {
    match rng.u8(0..4) {
        0 => (0..count)
            .map(|_| rng.i32(-20..20))
            .collect::<Vec<_>>()
            .into(),
        1 => (0..count)
            .map(|_| rng.u32(0..40))
            .collect::<Vec<_>>()
            .into(),
        2 => (0..count)
            .map(|_| rng.i64(-20..20))
            .collect::<Vec<_>>()
            .into(),
        _ => (0..count)
            .map(|_| random_double(rng))
            .collect::<Vec<_>>()
            .into(),
    }
}

/// Half-integers around zero, NaN one time in ten.
fn random_double(rng: &mut fastrand::Rng) -> f64 {
    if rng.u8(0..10) == 0 {
        f64::NAN
    } else {
        rng.i64(-40..40) as f64 / 2.0
    }
}

/// Random constraint on `column` whose literal matches the column's value type.
pub fn random_constraint(rng: &mut fastrand::Rng, column: &Column) -> Constraint {
    let op = OPS[rng.usize(..OPS.len())];
    let value = if op.is_null_check() {
        ScalarValue::Null
    } else if column.col_type().value_type() == ValueType::Double {
        ScalarValue::Double(random_double(rng))
    } else {
        ScalarValue::Long(rng.i64(-22..44))
    };
    Constraint::new(0, op, value)
}

/// Rows of `rm` satisfying `c`, evaluated value by value.
pub fn reference_filter(column: &Column, c: &Constraint, rm: &RowMap) -> Vec<u32> {
    rm.iter()
        .filter(|&row| {
            let value = column.value_ref(row);
            match c.op {
                FilterOp::IsNull => value.is_null(),
                FilterOp::IsNotNull => !value.is_null(),
                op => !value.is_null() && op.test_ordering(value.compare(c.value.as_ref())),
            }
        })
        .collect()
}

pub fn is_strictly_ascending(rows: &[u32]) -> bool {
    rows.windows(2).all(|pair| pair[0] < pair[1])
}
