use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use market_sim::{Instrument, TimeRange};
use runtime::{MarketEngine, Selection};

const BENCH_STEPS: u64 = 1_000;

fn bench_engine_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_refresh");
    group.throughput(Throughput::Elements(BENCH_STEPS));

    for range in [TimeRange::SevenDays, TimeRange::OneYear] {
        group.bench_with_input(
            BenchmarkId::new("step_once", range.as_str()),
            &range,
            |b, &range| {
                b.iter(|| {
                    let mut engine = MarketEngine::for_test_seed(7);
                    engine.select(Selection::new(Instrument::UsdBtc, range));
                    for _ in 0..BENCH_STEPS {
                        black_box(engine.step_once());
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_engine_refresh);
criterion_main!(benches);
