//! Application builder: wires cpal, midir and the control surface around
//! one [`MonoSynth`].

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use mono_osc::{MonoSynth, RawMidi, SynthParams, VoiceStatus, MAX_BLOCK_SIZE};

use super::command::Session;
use super::midi;
use super::shell;
use super::ui::{UiApp, UiStateInit, VIS_BUFFER_SIZE};

/// Raw MIDI messages buffered between the MIDI thread and the audio callback
const MIDI_RING_CAPACITY: usize = 1024;
/// Voice status updates buffered for the UI
const STATUS_RING_CAPACITY: usize = 64;

pub struct App {
    name: String,
    params: Arc<SynthParams>,
    midi_port: Option<String>,
    plain: bool,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Arc::new(SynthParams::new()),
            midi_port: None,
            plain: false,
        }
    }

    /// Use an already-configured parameter store
    pub fn params(mut self, params: Arc<SynthParams>) -> Self {
        self.params = params;
        self
    }

    /// MIDI port to open, by index or name substring
    pub fn midi_port(mut self, port: Option<String>) -> Self {
        self.midi_port = port;
        self
    }

    /// Line-oriented console instead of the TUI
    pub fn plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    /// Open the transports and run the control surface until the operator
    /// quits or the stream fails.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        log::info!(
            "audio device '{}': {} Hz, {} channels",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate,
            channels
        );

        let (midi_tx, mut midi_rx) = RingBuffer::<RawMidi>::new(MIDI_RING_CAPACITY);
        let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 4);
        let (mut status_tx, status_rx) = RingBuffer::<VoiceStatus>::new(STATUS_RING_CAPACITY);

        let midi = midi::connect(&self.name, self.midi_port.as_deref(), midi_tx)?;

        // Builds the frequency table for the stream's rate before the first render
        let mut synth = MonoSynth::new(sample_rate, Arc::clone(&self.params));

        let stream_failed = Arc::new(AtomicBool::new(false));
        let exit_on_error = self.plain;
        let on_error = {
            let stream_failed = Arc::clone(&stream_failed);
            move |err: cpal::StreamError| {
                stream_failed.store(true, Ordering::Release);
                log::error!("audio stream error: {err}");
                if exit_on_error {
                    eprintln!("audio stream error: {err}");
                    std::process::exit(1);
                }
            }
        };

        let channels = usize::from(channels);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames_to_render];
                        synth.render_block(block, &mut midi_rx);

                        // Mono to every channel
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            let frame = out_off + i * channels;
                            data[frame..frame + channels].fill(s);
                        }

                        for &s in block.iter() {
                            if audio_tx.push(s).is_err() {
                                break;
                            }
                        }

                        frames_written += frames_to_render;
                    }

                    let _ = status_tx.push(synth.status());
                },
                on_error,
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        let session = Session::new(Arc::clone(&self.params));
        let result = if self.plain {
            let mut session = session;
            let mut stdout = io::stdout();
            shell::run(&mut session, &self.name, io::stdin().lock(), &mut stdout)
                .wrap_err("console I/O failed")
        } else {
            let init = UiStateInit {
                name: self.name.clone(),
                sample_rate,
                channels: channels as u16,
                midi_port: midi.as_ref().map(|link| link.port_name().to_string()),
            };
            let mut terminal = ratatui::init();
            let result =
                UiApp::new(session, init, audio_rx, status_rx, stream_failed).run(&mut terminal);
            ratatui::restore();
            result
        };

        // Audio callbacks stop before the MIDI side closes
        drop(stream);
        drop(midi);
        log::info!("shut down");

        if self.plain {
            println!("Bye!");
        }
        result
    }
}
