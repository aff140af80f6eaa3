//! Low-level DSP primitives used by the mono voice renderer.
//!
//! Everything here is allocation-free and realtime-safe. The functions stay
//! focused on the signal math; event handling and parameter plumbing live in
//! [`crate::synth`].

/// Waveform partial sums and the phase accumulator.
pub mod oscillator;
/// Note-to-frequency conversion and the per-sample-rate increment table.
pub mod tuning;

pub use oscillator::{Phase, Waveform};
pub use tuning::FrequencyTable;
