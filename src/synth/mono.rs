use std::sync::Arc;

use crate::{
    dsp::{oscillator::Phase, tuning::FrequencyTable},
    io::midi::{MidiEvent, RawMidi},
    synth::{
        message::EventSource,
        notes::NoteRegistry,
        params::{ParamSnapshot, SynthParams},
    },
};

/// Most events pulled from an [`EventSource`] in one block; the rest wait
/// for the next block.
pub const MAX_EVENTS_PER_BLOCK: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Silent,              // No key held
    Sounding { note: u8 }, // Highest held key is playing
}

/// Per-block summary for display. `Copy`, so it can cross a ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoiceStatus {
    pub active_note: Option<u8>,
    pub held: u8,
}

/// Monophonic, highest-note-priority voice.
///
/// Owns the held-note registry and the oscillator phase; reads the shared
/// [`SynthParams`] once per block. Nothing in the render path allocates,
/// locks, or fails.
pub struct MonoSynth {
    params: Arc<SynthParams>,
    table: FrequencyTable,
    notes: NoteRegistry,
    phase: Phase,
    state: VoiceState,
    /// Note-on gain: 1.0 while sounding, 0.0 while silent.
    gate: f32,
}

impl MonoSynth {
    pub fn new(sample_rate: u32, params: Arc<SynthParams>) -> Self {
        Self {
            params,
            table: FrequencyTable::new(sample_rate),
            notes: NoteRegistry::new(),
            phase: Phase::default(),
            state: VoiceState::Silent,
            gate: 0.0,
        }
    }

    /// Sample-rate-changed notification from the transport.
    ///
    /// Takes `&mut self`, so it can never overlap a render call.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.table.rebuild(sample_rate);
    }

    pub fn sample_rate(&self) -> u32 {
        self.table.sample_rate()
    }

    /// Render `out.len()` frames, applying `events` at their frame offsets.
    ///
    /// A release requested through [`SynthParams::request_release`] is
    /// honoured before the first frame.
    ///
    /// `events` must be sorted by frame. Events that do not decode as a note
    /// on/off, or that fail the channel filter, are skipped. Events stamped
    /// past the end of the block are applied after the last frame.
    pub fn render(&mut self, out: &mut [f32], events: &[RawMidi]) {
        if self.params.take_release() {
            self.all_notes_off();
        }
        let params = self.params.snapshot();
        let mut pending = events.iter().peekable();

        for (frame, sample) in out.iter_mut().enumerate() {
            while let Some(event) = pending.next_if(|event| event.frame as usize <= frame) {
                self.apply(event, &params);
            }

            let level = self.gate * params.amplitude;
            *sample = match self.state {
                VoiceState::Sounding { note } => {
                    let phase = self.phase.advance(self.table.increment(note));
                    level * params.waveform.sample(phase, params.harmonics)
                }
                VoiceState::Silent => level,
            };
        }

        for event in pending {
            self.apply(event, &params);
        }
    }

    /// Drain up to [`MAX_EVENTS_PER_BLOCK`] events from `source`, then render.
    pub fn render_block<S: EventSource + ?Sized>(&mut self, out: &mut [f32], source: &mut S) {
        let mut events = [RawMidi::default(); MAX_EVENTS_PER_BLOCK];
        let mut count = 0;
        while count < MAX_EVENTS_PER_BLOCK {
            match source.pop() {
                Some(event) => {
                    events[count] = event;
                    count += 1;
                }
                None => break,
            }
        }

        self.render(out, &events[..count]);
    }

    /// Release every held note. The voice goes silent.
    pub fn all_notes_off(&mut self) {
        self.notes.clear();
        self.resolve();
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn active_note(&self) -> Option<u8> {
        match self.state {
            VoiceState::Sounding { note } => Some(note),
            VoiceState::Silent => None,
        }
    }

    pub fn status(&self) -> VoiceStatus {
        VoiceStatus {
            active_note: self.active_note(),
            held: self.notes.len() as u8,
        }
    }

    pub fn notes(&self) -> &NoteRegistry {
        &self.notes
    }

    pub fn phase(&self) -> f32 {
        self.phase.value()
    }

    pub fn frequency_table(&self) -> &FrequencyTable {
        &self.table
    }

    fn apply(&mut self, event: &RawMidi, params: &ParamSnapshot) {
        let Some(event) = event.decode() else {
            return;
        };
        if !params.accepts_channel(event.channel()) {
            return;
        }

        match event {
            MidiEvent::NoteOn { key, .. } => {
                self.notes.insert(key);
            }
            MidiEvent::NoteOff { key, .. } => {
                self.notes.remove(key);
            }
        }
        self.resolve();
    }

    /// Re-derive the sounding note from the registry.
    fn resolve(&mut self) {
        match self.notes.highest() {
            Some(note) => {
                self.state = VoiceState::Sounding { note };
                self.gate = 1.0;
            }
            None => {
                self.state = VoiceState::Silent;
                self.gate = 0.0;
            }
        }
    }
}
