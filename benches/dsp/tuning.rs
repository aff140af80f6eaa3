//! Benchmark for rebuilding the frequency table on a rate change.

use std::hint::black_box;

use criterion::Criterion;
use mono_osc::FrequencyTable;

pub fn bench_tuning(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/tuning");
    let mut table = FrequencyTable::new(44_100);

    group.bench_function("rebuild", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            table.rebuild(black_box(if flip { 48_000 } else { 44_100 }));
        })
    });

    group.finish();
}
