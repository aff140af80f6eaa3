//! Benchmarks for waveform evaluation.
//!
//! Cost grows with the iteration count for everything but the sine, so each
//! shape is measured at a few counts over one block of phases.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use mono_osc::{Phase, Waveform};

use crate::BLOCK_SIZES;

const HARMONICS: &[u32] = &[1, 8, 32, 128];

fn render(buffer: &mut [f32], waveform: Waveform, harmonics: u32) {
    let mut phase = Phase::default();
    let increment = 2.0 * 440.0 / 48_000.0;
    for sample in buffer.iter_mut() {
        *sample = waveform.sample(phase.advance(increment), harmonics);
    }
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let size = 256;
    let mut buffer = vec![0.0f32; size];

    group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
        b.iter(|| render(black_box(&mut buffer), Waveform::Sine, 1))
    });

    for waveform in [Waveform::Square, Waveform::Sawtooth, Waveform::Triangle] {
        for &harmonics in HARMONICS {
            let id = BenchmarkId::new(waveform.name(), format!("{size}x{harmonics}"));
            group.bench_with_input(id, &harmonics, |b, &harmonics| {
                b.iter(|| render(black_box(&mut buffer), waveform, black_box(harmonics)))
            });
        }
    }

    // Default iteration count across block sizes
    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("square_default", size), &size, |b, _| {
            b.iter(|| render(black_box(&mut buffer), Waveform::Square, 8))
        });
    }

    group.finish();
}
