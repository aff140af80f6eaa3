pub mod dsp; // Waveforms, phase accumulator, tuning
pub mod io; // Raw MIDI decoding
pub mod synth; // Note tracking, parameters, the mono voice renderer

pub use dsp::oscillator::{Phase, Waveform, MAX_HARMONICS};
pub use dsp::tuning::{note_frequency, note_name, FrequencyTable};
pub use io::midi::{MidiEvent, RawMidi};
pub use synth::message::EventSource;
pub use synth::mono::{MonoSynth, VoiceState, VoiceStatus};
pub use synth::notes::NoteRegistry;
pub use synth::params::{EnvelopeSettings, ParamError, ParamSnapshot, SynthParams};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Number of MIDI note numbers (0..=127).
pub const NOTE_COUNT: usize = 128;
