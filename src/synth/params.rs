//! Parameters shared between the control thread and the audio callback.
//!
//! Every field is its own atomic, so the control side never blocks the audio
//! side and the audio side never sees a torn value. Floats are stored as their
//! bit patterns in `AtomicU32`. The renderer takes one [`ParamSnapshot`] per
//! block.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::{Waveform, MAX_HARMONICS};

/// Highest MIDI channel number; channel 0 means "listen to all".
pub const MAX_CHANNEL: u8 = 16;

/// Rejected control-surface input. The stored value is left as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("invalid waveform '{0}', expected a letter from a to d")]
    InvalidWaveform(char),

    #[error("harmonic count {0} out of range (1..=512)")]
    HarmonicsOutOfRange(u32),

    #[error("channel {0} out of range (0 = omni, 1..=16)")]
    ChannelOutOfRange(u8),

    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("sustain level {0} out of range (0.0..=1.0)")]
    SustainOutOfRange(f32),

    #[error("'{input}' is not a valid {expected}")]
    Parse { input: String, expected: &'static str },
}

impl ParamError {
    /// Parse operator text, naming what was expected on failure.
    pub fn parse<T: FromStr>(input: &str, expected: &'static str) -> Result<T, Self> {
        let input = input.trim();
        input.parse().map_err(|_| ParamError::Parse {
            input: input.to_string(),
            expected,
        })
    }
}

/// Attack/decay/sustain settings. Stored and shown, not applied to the output.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSettings {
    pub attack_ms: u32,
    pub attack_amplitude: f32,
    pub decay_ms: u32,
    pub sustain: f32,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            attack_ms: 10,
            attack_amplitude: 1.0,
            decay_ms: 100,
            sustain: 0.7,
        }
    }
}

/// A consistent-enough copy of the parameters, taken once per block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Output gain. Negative values invert the waveform.
    pub amplitude: f32,
    pub waveform: Waveform,
    pub harmonics: u32,
    /// 0 = omni, otherwise 1..=16.
    pub channel: u8,
    pub envelope: EnvelopeSettings,
}

impl ParamSnapshot {
    /// Whether an event on zero-based `channel` passes the channel filter.
    #[inline]
    pub fn accepts_channel(&self, channel: u8) -> bool {
        self.channel == 0 || channel == self.channel - 1
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            waveform: Waveform::Sine,
            harmonics: 8,
            channel: 0,
            envelope: EnvelopeSettings::default(),
        }
    }
}

/// `f32` stored as bits.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    #[inline]
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// Lock-free parameter store. Share it with `Arc<SynthParams>`.
#[derive(Debug)]
pub struct SynthParams {
    amplitude: AtomicF32,
    waveform: AtomicU8,
    harmonics: AtomicU32,
    channel: AtomicU8,
    attack_ms: AtomicU32,
    attack_amplitude: AtomicF32,
    decay_ms: AtomicU32,
    sustain: AtomicF32,
    /// Pending "release every note" request, consumed by the renderer.
    release: AtomicBool,
}

impl SynthParams {
    pub fn new() -> Self {
        Self::from_snapshot(ParamSnapshot::default())
    }

    /// Seed the store from a snapshot. Values are taken as given.
    pub fn from_snapshot(snapshot: ParamSnapshot) -> Self {
        let envelope = snapshot.envelope;
        Self {
            amplitude: AtomicF32::new(snapshot.amplitude),
            waveform: AtomicU8::new(snapshot.waveform as u8),
            harmonics: AtomicU32::new(snapshot.harmonics.clamp(1, MAX_HARMONICS)),
            channel: AtomicU8::new(snapshot.channel.min(MAX_CHANNEL)),
            attack_ms: AtomicU32::new(envelope.attack_ms),
            attack_amplitude: AtomicF32::new(envelope.attack_amplitude),
            decay_ms: AtomicU32::new(envelope.decay_ms),
            sustain: AtomicF32::new(envelope.sustain),
            release: AtomicBool::new(false),
        }
    }

    /// Read every parameter. Each load is atomic on its own; there is no
    /// grouping across fields, so a block may pair an old waveform with a
    /// new amplitude while the control thread is mid-update.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            amplitude: self.amplitude.load(),
            waveform: self.waveform(),
            harmonics: self.harmonics.load(Ordering::Acquire),
            channel: self.channel.load(Ordering::Acquire),
            envelope: self.envelope(),
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude.load()
    }

    /// Any finite value. Negative amplitude inverts the output phase.
    pub fn set_amplitude(&self, amplitude: f32) -> Result<(), ParamError> {
        if !amplitude.is_finite() {
            return Err(ParamError::NotFinite {
                name: "amplitude",
                value: amplitude,
            });
        }
        self.amplitude.store(amplitude);
        Ok(())
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_index(self.waveform.load(Ordering::Acquire))
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.store(waveform as u8, Ordering::Release);
    }

    /// Select the waveform by its console letter (`a`..`d`).
    pub fn set_waveform_letter(&self, letter: char) -> Result<Waveform, ParamError> {
        let waveform = Waveform::from_letter(letter).ok_or(ParamError::InvalidWaveform(letter))?;
        self.set_waveform(waveform);
        Ok(waveform)
    }

    pub fn harmonics(&self) -> u32 {
        self.harmonics.load(Ordering::Acquire)
    }

    pub fn set_harmonics(&self, harmonics: u32) -> Result<(), ParamError> {
        if !(1..=MAX_HARMONICS).contains(&harmonics) {
            return Err(ParamError::HarmonicsOutOfRange(harmonics));
        }
        self.harmonics.store(harmonics, Ordering::Release);
        Ok(())
    }

    pub fn channel(&self) -> u8 {
        self.channel.load(Ordering::Acquire)
    }

    /// 0 listens to every channel, 1..=16 to that channel only.
    pub fn set_channel(&self, channel: u8) -> Result<(), ParamError> {
        if channel > MAX_CHANNEL {
            return Err(ParamError::ChannelOutOfRange(channel));
        }
        self.channel.store(channel, Ordering::Release);
        Ok(())
    }

    pub fn envelope(&self) -> EnvelopeSettings {
        EnvelopeSettings {
            attack_ms: self.attack_ms.load(Ordering::Acquire),
            attack_amplitude: self.attack_amplitude.load(),
            decay_ms: self.decay_ms.load(Ordering::Acquire),
            sustain: self.sustain.load(),
        }
    }

    pub fn set_attack(&self, time_ms: u32, amplitude: f32) -> Result<(), ParamError> {
        if !amplitude.is_finite() {
            return Err(ParamError::NotFinite {
                name: "attack amplitude",
                value: amplitude,
            });
        }
        self.attack_ms.store(time_ms, Ordering::Release);
        self.attack_amplitude.store(amplitude);
        Ok(())
    }

    pub fn set_decay(&self, time_ms: u32) {
        self.decay_ms.store(time_ms, Ordering::Release);
    }

    pub fn set_sustain(&self, level: f32) -> Result<(), ParamError> {
        if !level.is_finite() {
            return Err(ParamError::NotFinite {
                name: "sustain",
                value: level,
            });
        }
        if !(0.0..=1.0).contains(&level) {
            return Err(ParamError::SustainOutOfRange(level));
        }
        self.sustain.store(level);
        Ok(())
    }

    /// Ask the renderer to drop every held note at the start of its next
    /// block. Clears notes stuck by a lost note-off.
    pub fn request_release(&self) {
        self.release.store(true, Ordering::Release);
    }

    /// Consume a pending release request.
    #[inline]
    pub fn take_release(&self) -> bool {
        self.release.swap(false, Ordering::AcqRel)
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        Self::new()
    }
}
