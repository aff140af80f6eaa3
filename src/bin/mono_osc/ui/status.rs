//! Status bar: client, audio format, MIDI port, sounding note, output level

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use mono_osc::{note_frequency, note_name, VoiceStatus};

use super::UiStateInit;

/// Output level of the scope buffer
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    init: &UiStateInit,
    voice: &VoiceStatus,
    stats: &AudioStats,
) {
    let block = Block::default()
        .title(format!(" {} ", init.name))
        .borders(Borders::ALL);

    let note = match voice.active_note {
        Some(note) => Span::styled(
            format!("♪ {:<4} {:>8.2} Hz  ", note_name(note), note_frequency(note)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("♪ --               ", Style::default().fg(Color::DarkGray)),
    };

    let port = init.midi_port.as_deref().unwrap_or("no MIDI input");

    let line = Line::from(vec![
        Span::raw(" "),
        note,
        Span::styled(
            format!("held: {:<3}  ", voice.held),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz x{}  ", init.sample_rate as f32 / 1000.0, init.channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{port}  "), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
