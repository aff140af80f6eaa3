//! Benchmarks for MonoSynth blocks.
//!
//! "held" renders a sustained chord (the top note sounds), "trill" feeds a
//! note on/off pair every block the way a fast player would.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use mono_osc::{MonoSynth, RawMidi, SynthParams, Waveform};

use crate::BLOCK_SIZES;

fn synth(waveform: Waveform) -> MonoSynth {
    let params = Arc::new(SynthParams::new());
    params.set_waveform(waveform);
    let mut synth = MonoSynth::new(48_000, params);
    synth.render(
        &mut [0.0; 1],
        &[
            RawMidi::note_on(0, 0, 48, 100),
            RawMidi::note_on(0, 0, 55, 100),
            RawMidi::note_on(0, 0, 60, 100),
        ],
    );
    synth
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut silent = MonoSynth::new(48_000, Arc::new(SynthParams::new()));
        group.bench_with_input(BenchmarkId::new("silent", size), &size, |b, _| {
            b.iter(|| silent.render(black_box(&mut buffer), &[]))
        });

        for waveform in [Waveform::Sine, Waveform::Sawtooth] {
            let mut held = synth(waveform);
            let id = BenchmarkId::new(format!("held_{}", waveform.name()), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| held.render(black_box(&mut buffer), &[]))
            });
        }

        let mut trill = synth(Waveform::Square);
        let events = [
            RawMidi::note_on(0, 0, 72, 100),
            RawMidi::note_off(size as u32 / 2, 0, 72),
        ];
        group.bench_with_input(BenchmarkId::new("trill", size), &size, |b, _| {
            b.iter(|| trill.render(black_box(&mut buffer), black_box(&events)))
        });
    }

    group.finish();
}
