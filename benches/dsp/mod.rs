//! Benchmarks for the waveform and tuning primitives.

mod oscillator;
mod tuning;

pub use oscillator::bench_oscillator;
pub use tuning::bench_tuning;
