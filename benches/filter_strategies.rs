use colfilter::{
    overlay::{NullOverlay, Overlay},
    query::{Constraint, FilterConfig, QueryExecutor, SimpleColumn, StrategyPolicy},
    storage::NumericStorage,
    BitVector, RowMap,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const ROWS: u32 = 1 << 20;

fn candidates(rng: &mut fastrand::Rng, per_mille: u32) -> RowMap {
    RowMap::from_bit_vector((0..ROWS).map(|_| rng.u32(0..1000) < per_mille).collect())
}

fn strategies(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(17);
    let non_null: BitVector = (0..ROWS).map(|_| rng.u8(0..10) < 8).collect();
    let storage = NumericStorage::from(
        (0..non_null.count_set_bits())
            .map(|_| rng.i64(0..1_000))
            .collect::<Vec<_>>(),
    );
    let null = NullOverlay::new(&non_null);
    let overlays: Vec<&dyn Overlay> = vec![&null];
    let column = SimpleColumn::new(overlays, &storage);
    let constraint = Constraint::lt(0, 500i64);

    let mut group = c.benchmark_group("filter_column");
    for per_mille in [1, 10, 100, 500, 900] {
        let rm = candidates(&mut rng, per_mille);
        for policy in [StrategyPolicy::Bounded, StrategyPolicy::Indexed] {
            let executor = QueryExecutor::new(
                FilterConfig::default()
                    .policy(policy)
                    .max_overlay_count(1),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("{policy:?}"), per_mille),
                &rm,
                |b, rm| {
                    b.iter(|| {
                        let mut out = rm.clone();
                        executor.filter_column(&constraint, &column, &mut out);
                        black_box(out)
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, strategies);
criterion_main!(benches);
