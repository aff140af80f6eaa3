//! Terminal control surface
//!
//! Shows the parameters, the sounding note and a scope/spectrum of the
//! output, and drives the same command session as the plain shell.

mod params;
mod spectrum;
pub mod state;
mod status;
mod waveform;

use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use mono_osc::VoiceStatus;

use crate::command::{Reply, Session, HELP};

pub use state::UiStateInit;

use params::render_params;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Samples kept for the scope and the FFT
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Message lines kept for the log panel
const MESSAGE_LINES: usize = 32;

pub struct UiApp {
    session: Session,
    init: UiStateInit,
    audio_rx: Consumer<f32>,
    status_rx: Consumer<VoiceStatus>,
    /// Latest voice status from the audio thread
    voice: VoiceStatus,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    /// Text typed at the open prompt
    input: String,
    messages: VecDeque<String>,
    show_help: bool,
    /// Set by the stream error callback
    stream_failed: Arc<AtomicBool>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        session: Session,
        init: UiStateInit,
        audio_rx: Consumer<f32>,
        status_rx: Consumer<VoiceStatus>,
        stream_failed: Arc<AtomicBool>,
    ) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, init.sample_rate);
        let mut messages = VecDeque::with_capacity(MESSAGE_LINES);
        messages.push_back("Hi! if you need help, type h".to_string());
        Self {
            session,
            init,
            audio_rx,
            status_rx,
            voice: VoiceStatus::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            input: String::new(),
            messages,
            show_help: false,
            stream_failed,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            if self.stream_failed.load(Ordering::Acquire) {
                return Err(eyre!("audio stream stopped"));
            }

            self.poll_audio();
            self.poll_status();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain the sample ring, keeping the last VIS_BUFFER_SIZE samples.
    fn poll_audio(&mut self) {
        let before = self.audio_buffer.len();
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }

        if self.audio_buffer.len() > before {
            let excess = self.audio_buffer.len().saturating_sub(VIS_BUFFER_SIZE);
            self.audio_buffer.drain(..excess);
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.voice = status;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.session.pending().is_some() {
            match key.code {
                KeyCode::Char(c) => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => {
                    let reply = self.session.answer(&self.input);
                    self.input.clear();
                    self.report(reply);
                }
                KeyCode::Esc => {
                    self.session.cancel();
                    self.input.clear();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => {
                let reply = self.session.command(c);
                self.report(reply);
            }
            KeyCode::Esc => self.show_help = false,
            _ => {}
        }
    }

    fn report(&mut self, reply: Reply) {
        match reply {
            Reply::Idle | Reply::Ask => {}
            Reply::Done(message) => message.lines().for_each(|line| self.push_message(line.to_string())),
            Reply::Rejected(err) => self.push_message(format!("Error: {err}")),
            Reply::UnknownCommand(key) => {
                self.push_message(format!("Unknown command '{key}', type h for help"))
            }
            Reply::Help => self.show_help = !self.show_help,
            Reply::Quit => self.should_quit = true,
        }
    }

    fn push_message(&mut self, line: String) {
        if self.messages.len() == MESSAGE_LINES {
            self.messages.pop_front();
        }
        self.messages.push_back(line);
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Min(10),    // Parameters + scope
                Constraint::Length(10), // Spectrum + messages
                Constraint::Length(1),  // Prompt
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(frame, chunks[0], &self.init, &self.voice, &stats);

        let params = self.session.params().snapshot();
        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(20)])
            .split(chunks[1]);
        render_params(frame, middle[0], &params);
        render_waveform(frame, middle[1], &self.audio_buffer, params.amplitude);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        render_spectrum(frame, bottom[0], &self.spectrum);
        self.render_messages(frame, bottom[1]);

        let prompt = match self.session.prompt() {
            Some(prompt) => Paragraph::new(format!(" {prompt}{}_", self.input))
                .style(Style::default().fg(Color::Yellow)),
            None => Paragraph::new(" [h] Help  [!] Release notes  [q] Quit")
                .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(prompt, chunks[3]);
    }

    fn render_messages(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let (title, lines): (&str, Vec<Line>) = if self.show_help {
            (" Help ", HELP.lines().map(Line::from).collect())
        } else {
            let visible = area.height.saturating_sub(2) as usize;
            let skip = self.messages.len().saturating_sub(visible);
            (
                " Messages ",
                self.messages.iter().skip(skip).map(|m| Line::from(m.as_str())).collect(),
            )
        };

        let panel = Paragraph::new(lines)
            .block(Block::default().title(title).borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(panel, area);
    }
}
