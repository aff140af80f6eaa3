//! MIDI input through midir.
//!
//! The midir callback runs on its own thread and only copies the raw bytes
//! into the ring the audio callback drains. Timing inside the block is not
//! known here, so every event is stamped at frame 0.

use color_eyre::eyre::{eyre, Result as EyreResult};
use midir::{Ignore, MidiInput, MidiInputConnection};
use rtrb::Producer;

use mono_osc::RawMidi;

/// An open input connection. Dropping it closes the port.
pub struct MidiLink {
    _connection: MidiInputConnection<Producer<RawMidi>>,
    port_name: String,
}

impl MidiLink {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

fn forward(_stamp: u64, message: &[u8], tx: &mut Producer<RawMidi>) {
    // A full ring drops the event
    let _ = tx.push(RawMidi::new(0, message));
}

pub fn list_ports(client: &str) -> EyreResult<Vec<String>> {
    let midi_in = MidiInput::new(client).map_err(|e| eyre!("MIDI input unavailable: {e}"))?;
    Ok(midi_in
        .ports()
        .iter()
        .map(|port| midi_in.port_name(port).unwrap_or_else(|_| "<unnamed>".to_string()))
        .collect())
}

/// Pick a port by index or by case-insensitive name substring.
pub fn select_port(names: &[String], selector: &str) -> Option<usize> {
    if let Ok(index) = selector.trim().parse::<usize>() {
        return (index < names.len()).then_some(index);
    }
    let needle = selector.trim().to_lowercase();
    names
        .iter()
        .position(|name| name.to_lowercase().contains(&needle))
}

/// Connect to the port matching `selector`, or the first port when `None`.
///
/// A selector that matches nothing is an error. With no selector and no
/// ports, returns `Ok(None)` and the synth stays silent.
pub fn connect(
    client: &str,
    selector: Option<&str>,
    tx: Producer<RawMidi>,
) -> EyreResult<Option<MidiLink>> {
    let mut midi_in = MidiInput::new(client).map_err(|e| eyre!("MIDI input unavailable: {e}"))?;
    midi_in.ignore(Ignore::All);

    let ports = midi_in.ports();
    let names: Vec<String> = ports
        .iter()
        .map(|port| midi_in.port_name(port).unwrap_or_else(|_| "<unnamed>".to_string()))
        .collect();

    let index = match selector {
        Some(selector) => select_port(&names, selector)
            .ok_or_else(|| eyre!("no MIDI input port matches '{selector}'"))?,
        None if ports.is_empty() => {
            log::warn!("no MIDI input ports found, running without MIDI");
            return Ok(None);
        }
        None => 0,
    };

    let port_name = names[index].clone();
    let connection = midi_in
        .connect(&ports[index], "in", forward, tx)
        .map_err(|e| eyre!("failed to connect to MIDI port '{port_name}': {e}"))?;
    log::info!("connected to MIDI port '{port_name}'");

    Ok(Some(MidiLink {
        _connection: connection,
        port_name,
    }))
}
