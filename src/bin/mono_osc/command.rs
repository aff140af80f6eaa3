//! Operator commands shared by the TUI and the plain shell.
//!
//! A command is one key. Most keys open a prompt; the answer goes through the
//! validated [`SynthParams`] setters, so bad input never reaches the audio
//! thread. A rejected answer leaves the prompt open for another try.

use std::sync::Arc;

use mono_osc::{ParamError, SynthParams};

pub const HELP: &str = "\
h -> help
c -> change channel
W -> change waveform
A -> set amplitude (volume)
i -> set number of fourier iterations
a -> set attack (time, amplitude)
d -> set decay time
s -> set sustain level
! -> release every held note
q -> quit

More fourier iterations give sharper square, sawtooth and triangle waves
but cost more CPU. Around 20 is plenty for most ears.";

/// A value the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Channel,
    Waveform,
    Amplitude,
    Harmonics,
    AttackTime,
    AttackAmplitude { time_ms: u32 },
    Decay,
    Sustain,
}

impl Field {
    pub fn prompt(self) -> &'static str {
        match self {
            Field::Channel => "select channel from 0 (all) to 16: ",
            Field::Waveform => "waveform (a sine, b square, c sawtooth, d triangle): ",
            Field::Amplitude => "Set new max amplitude: ",
            Field::Harmonics => "N° of fourier iterations: ",
            Field::AttackTime => "attack time (ms): ",
            Field::AttackAmplitude { .. } => "attack amplitude: ",
            Field::Decay => "decay time (ms): ",
            Field::Sustain => "sustain level (0 to 1): ",
        }
    }
}

/// What the front end should show after a key or an answer.
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Nothing to show.
    Idle,
    /// A prompt is open; show [`Session::prompt`].
    Ask,
    Done(String),
    Rejected(ParamError),
    UnknownCommand(char),
    Help,
    Quit,
}

enum Step {
    Next(Field),
    Done(String),
}

pub struct Session {
    params: Arc<SynthParams>,
    pending: Option<Field>,
}

impl Session {
    pub fn new(params: Arc<SynthParams>) -> Self {
        Self {
            params,
            pending: None,
        }
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    pub fn pending(&self) -> Option<Field> {
        self.pending
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.pending.map(Field::prompt)
    }

    /// Handle a command key. Ignored while a prompt is open.
    pub fn command(&mut self, key: char) -> Reply {
        if self.pending.is_some() || key.is_whitespace() {
            return Reply::Idle;
        }

        let field = match key {
            'h' => return Reply::Help,
            'q' => return Reply::Quit,
            '!' => {
                self.params.request_release();
                log::info!("released all notes");
                return Reply::Done("All notes released".to_string());
            }
            'c' => Field::Channel,
            'W' => Field::Waveform,
            'A' => Field::Amplitude,
            'i' => Field::Harmonics,
            'a' => Field::AttackTime,
            'd' => Field::Decay,
            's' => Field::Sustain,
            other => return Reply::UnknownCommand(other),
        };
        self.pending = Some(field);
        Reply::Ask
    }

    /// Answer the open prompt.
    pub fn answer(&mut self, input: &str) -> Reply {
        let Some(field) = self.pending else {
            return Reply::Idle;
        };

        match self.apply(field, input.trim()) {
            Ok(Step::Next(next)) => {
                self.pending = Some(next);
                Reply::Ask
            }
            Ok(Step::Done(message)) => {
                self.pending = None;
                log::info!("{}", message.replace('\n', " "));
                Reply::Done(message)
            }
            Err(err) => {
                log::warn!("rejected {field:?} input: {err}");
                Reply::Rejected(err)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn apply(&self, field: Field, input: &str) -> Result<Step, ParamError> {
        let params = &self.params;
        let message = match field {
            Field::Channel => {
                let channel: u8 = ParamError::parse(input, "channel")?;
                params.set_channel(channel)?;
                if channel == 0 {
                    "Listening on all midi channels".to_string()
                } else {
                    format!("Changed midi channel to {channel}")
                }
            }
            Field::Waveform => {
                let mut chars = input.chars();
                let letter = match (chars.next(), chars.next()) {
                    (Some(letter), None) => letter,
                    _ => {
                        return Err(ParamError::Parse {
                            input: input.to_string(),
                            expected: "waveform letter",
                        })
                    }
                };
                let waveform = params.set_waveform_letter(letter)?;
                format!("Changed waveform: {waveform}")
            }
            Field::Amplitude => {
                let amplitude: f32 = ParamError::parse(input, "amplitude")?;
                params.set_amplitude(amplitude)?;
                if amplitude < 0.0 {
                    format!("New amplitude = {amplitude}\nA < 0 => Inverted Phase")
                } else {
                    format!("New amplitude = {amplitude}")
                }
            }
            Field::Harmonics => {
                let harmonics: u32 = ParamError::parse(input, "iteration count")?;
                params.set_harmonics(harmonics)?;
                format!("Fourier iterations = {harmonics}")
            }
            Field::AttackTime => {
                let time_ms: u32 = ParamError::parse(input, "attack time")?;
                return Ok(Step::Next(Field::AttackAmplitude { time_ms }));
            }
            Field::AttackAmplitude { time_ms } => {
                let amplitude: f32 = ParamError::parse(input, "attack amplitude")?;
                params.set_attack(time_ms, amplitude)?;
                format!("Attack = {time_ms} ms, {amplitude} A")
            }
            Field::Decay => {
                let time_ms: u32 = ParamError::parse(input, "decay time")?;
                params.set_decay(time_ms);
                format!("Decay time = {time_ms} ms")
            }
            Field::Sustain => {
                let level: f32 = ParamError::parse(input, "sustain level")?;
                params.set_sustain(level)?;
                format!("Sustain = {level}")
            }
        };
        Ok(Step::Done(message))
    }
}
