//! Spectrum widget
//!
//! Hann-windowed FFT of the scope buffer, sampled at log-spaced frequencies
//! and plotted against log10(Hz). The strongest bin is reported so the
//! played pitch can be checked against the note display.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Points on the plotted curve
const SPECTRUM_POINTS: usize = 64;
/// Lowest plotted frequency
const MIN_FREQ: f64 = 20.0;
/// Floor for the dB scale
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin for each plotted point
    bins: Vec<usize>,
    /// (log10 Hz, dB)
    points: Vec<(f64, f64)>,
    /// Hz per FFT bin
    resolution: f64,
    /// Frequency of the strongest bin, if above the floor
    dominant: Option<f64>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: u32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let sample_rate = f64::from(sample_rate.max(1));
        let resolution = sample_rate / buffer_len as f64;
        let half = buffer_len / 2;
        let max_freq = (sample_rate / 2.0).min(20_000.0).max(MIN_FREQ * 2.0);
        let ratio = max_freq / MIN_FREQ;

        let mut bins = Vec::with_capacity(SPECTRUM_POINTS);
        let mut points = Vec::with_capacity(SPECTRUM_POINTS);
        for i in 0..SPECTRUM_POINTS {
            let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
            let freq = MIN_FREQ * ratio.powf(t);
            bins.push(((freq / resolution).round() as usize).min(half - 1));
            points.push((freq.log10(), FLOOR_DB));
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bins,
            points,
            resolution,
            dominant: None,
        }
    }

    /// Recompute from `buffer`. Buffers of the wrong length are ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let half = self.scratch.len() / 2;
        let power_db = |bin: Complex<f32>| 10.0 * f64::from(bin.norm_sqr().max(1e-12)).log10();

        for (point, &bin) in self.points.iter_mut().zip(&self.bins) {
            point.1 = power_db(self.scratch[bin]).max(FLOOR_DB);
        }

        // Skip DC
        self.dominant = self.scratch[1..half]
            .iter()
            .enumerate()
            .map(|(i, &bin)| (i + 1, power_db(bin)))
            .filter(|&(_, db)| db > FLOOR_DB + 40.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(bin, _)| bin as f64 * self.resolution);
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn dominant(&self) -> Option<f64> {
        self.dominant
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, analyzer: &SpectrumAnalyzer) {
    let title = match analyzer.dominant() {
        Some(freq) => format!(" Spectrum (peak ~{freq:.0} Hz) "),
        None => " Spectrum ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let data = analyzer.data();
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(data);

    let (min_x, max_x) = match (data.first(), data.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => (MIN_FREQ.log10(), 20_000f64.log10()),
    };
    let max_db = data.iter().map(|&(_, db)| db).fold(0.0, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db + 10.0])
                .labels(["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
