//! Parameter panel

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use mono_osc::ParamSnapshot;

fn row<'a>(key: &'a str, label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" [{key}] "), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{label:<11}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

pub fn render_params(frame: &mut Frame, area: Rect, params: &ParamSnapshot) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let amplitude = if params.amplitude < 0.0 {
        format!("{:.2} (inverted)", params.amplitude)
    } else {
        format!("{:.2}", params.amplitude)
    };
    let channel = match params.channel {
        0 => "all".to_string(),
        n => n.to_string(),
    };
    let envelope = params.envelope;

    let lines = vec![
        row("W", "waveform", format!("{} ({})", params.waveform, params.waveform.letter())),
        row("A", "amplitude", amplitude),
        row("i", "iterations", params.harmonics.to_string()),
        row("c", "channel", channel),
        row(
            "a",
            "attack",
            format!("{} ms @ {:.2}", envelope.attack_ms, envelope.attack_amplitude),
        ),
        row("d", "decay", format!("{} ms", envelope.decay_ms)),
        row("s", "sustain", format!("{:.2}", envelope.sustain)),
        Line::from(Span::styled(
            " envelope is stored, not applied",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
