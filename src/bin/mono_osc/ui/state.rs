//! State handed to the UI.
//!
//! Static data is sent once at start. Per-block voice updates arrive as
//! [`mono_osc::VoiceStatus`] through a ring buffer, so nothing here is
//! touched by the audio thread.

/// Sent once at start (can allocate)
#[derive(Clone, Debug)]
pub struct UiStateInit {
    /// Client name shown in the title bar
    pub name: String,
    /// Audio sample rate in Hz
    pub sample_rate: u32,
    /// Output channel count
    pub channels: u16,
    /// Connected MIDI port, if any
    pub midi_port: Option<String>,
}
