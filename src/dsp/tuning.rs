use crate::NOTE_COUNT;

/*
Tuning
======

Twelve-tone equal temperament anchored at A4:

    f(note) = 440 * 2^((note - 69) / 12)

The oscillator works in phase units where one cycle spans 2 (see
`oscillator.rs`), so a note advances the phase by

    increment(note) = 2 * f(note) / sample_rate

per sample. Those 128 increments only depend on the sample rate, so they are
computed once per rate and looked up by note number in the audio thread.
*/

/// MIDI note number of the tuning anchor.
pub const A4_NOTE: u8 = 69;
/// Frequency of the tuning anchor in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Frequency in Hz of a MIDI note number.
#[inline]
pub fn note_frequency(note: u8) -> f64 {
    A4_FREQUENCY * 2.0_f64.powf((note as f64 - A4_NOTE as f64) / 12.0)
}

/// Scientific pitch name, middle C (60) is "C4".
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

/// Phase increment per sample for every MIDI note at one sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    increments: [f32; NOTE_COUNT],
    sample_rate: u32,
}

impl FrequencyTable {
    pub fn new(sample_rate: u32) -> Self {
        let mut table = Self {
            increments: [0.0; NOTE_COUNT],
            sample_rate: 0,
        };
        table.rebuild(sample_rate);
        table
    }

    /// Recompute every entry for a new sample rate.
    ///
    /// The new table is built aside and swapped in whole. A rate of zero has
    /// no meaningful increments and leaves the current table untouched.
    pub fn rebuild(&mut self, sample_rate: u32) {
        if sample_rate == 0 {
            return;
        }

        let rate = sample_rate as f64;
        let mut increments = [0.0f32; NOTE_COUNT];
        for (note, increment) in increments.iter_mut().enumerate() {
            *increment = (2.0 * note_frequency(note as u8) / rate) as f32;
        }

        self.increments = increments;
        self.sample_rate = sample_rate;
    }

    /// Phase increment for `note`. Notes outside 0..=127 get zero.
    #[inline]
    pub fn increment(&self, note: u8) -> f32 {
        self.increments.get(note as usize).copied().unwrap_or(0.0)
    }

    /// Sample rate the table was built for, zero if never built.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.increments
    }
}
