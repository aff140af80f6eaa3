//! Raw MIDI as delivered by the transport, and the note events the voice
//! renderer understands.

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

/// Longest channel message the renderer cares about (status + two data bytes).
pub const MAX_MESSAGE_LEN: usize = 3;

/// Velocity assumed for a note-on that arrives without a velocity byte.
const DEFAULT_VELOCITY: u8 = 64;

/// One raw MIDI message stamped with its frame offset inside a block.
///
/// Fixed-size and `Copy` so it can travel through a lock-free ring and sit in
/// a stack array in the audio callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawMidi {
    /// Frame index relative to the start of the block.
    pub frame: u32,
    data: [u8; MAX_MESSAGE_LEN],
    len: u8,
}

impl RawMidi {
    /// Copy up to three bytes of `bytes`. Longer messages (sysex) are cut and
    /// will fail to decode as notes unless they really are note messages.
    pub fn new(frame: u32, bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_MESSAGE_LEN);
        let mut data = [0u8; MAX_MESSAGE_LEN];
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            frame,
            data,
            len: len as u8,
        }
    }

    pub fn note_on(frame: u32, channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(frame, &[NOTE_ON | (channel & 0x0f), key, velocity])
    }

    pub fn note_off(frame: u32, channel: u8, key: u8) -> Self {
        Self::new(frame, &[NOTE_OFF | (channel & 0x0f), key, 0])
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    pub fn decode(&self) -> Option<MidiEvent> {
        MidiEvent::decode(self.bytes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Decode a note-on (status nibble 0x9) or note-off (0x8).
    ///
    /// Returns `None` for every other status and for malformed data: a
    /// missing key byte or a data byte with its high bit set. A note-on with
    /// velocity zero decodes as a note-off.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        let &key = data.first()?;
        let velocity = data.get(1).copied();
        if key > 0x7f || velocity.is_some_and(|v| v > 0x7f) {
            return None;
        }
        let channel = status & 0x0f;

        match status & 0xf0 {
            NOTE_ON => {
                let velocity = velocity.unwrap_or(DEFAULT_VELOCITY);
                if velocity == 0 {
                    Some(MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity,
                    })
                } else {
                    Some(MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    })
                }
            }
            NOTE_OFF => {
                let velocity = velocity.unwrap_or(0);
                Some(MidiEvent::NoteOff {
                    channel,
                    key,
                    velocity,
                })
            }
            _ => None,
        }
    }

    /// Zero-based channel from the low status nibble.
    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => channel,
        }
    }

    pub fn key(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_note_on_and_off() {
        assert_eq!(
            MidiEvent::decode(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::decode(&[0x80, 60, 12]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 60,
                velocity: 12
            })
        );
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let event = MidiEvent::decode(&[0x90, 64, 0]);
        assert!(matches!(event, Some(MidiEvent::NoteOff { key: 64, .. })));
    }

    #[test]
    fn two_byte_note_on_still_plays() {
        let event = MidiEvent::decode(&[0x90, 64]);
        assert!(matches!(event, Some(MidiEvent::NoteOn { key: 64, .. })));
    }

    #[test]
    fn ignores_other_statuses() {
        assert_eq!(MidiEvent::decode(&[0xb0, 7, 100]), None); // CC
        assert_eq!(MidiEvent::decode(&[0xe0, 0, 64]), None); // pitch bend
        assert_eq!(MidiEvent::decode(&[0xf8]), None); // clock
    }

    #[test]
    fn ignores_malformed_messages() {
        assert_eq!(MidiEvent::decode(&[]), None);
        assert_eq!(MidiEvent::decode(&[0x90]), None);
        assert_eq!(MidiEvent::decode(&[0x90, 200, 100]), None);
        assert_eq!(MidiEvent::decode(&[0x90, 60, 0x80]), None);
    }

    #[test]
    fn high_bit_velocity_is_rejected_for_on_and_off() {
        assert_eq!(MidiEvent::decode(&[0x90, 60, 0xff]), None);
        assert_eq!(MidiEvent::decode(&[0x80, 60, 0xff]), None);
        assert_eq!(MidiEvent::decode(&[0x80, 60, 0x80]), None);
        assert!(matches!(
            MidiEvent::decode(&[0x80, 60]),
            Some(MidiEvent::NoteOff { velocity: 0, .. })
        ));
    }

    #[test]
    fn raw_midi_truncates_long_messages() {
        let raw = RawMidi::new(5, &[0x90, 60, 100, 1, 2, 3]);
        assert_eq!(raw.bytes(), &[0x90, 60, 100]);
        assert_eq!(raw.frame, 5);
        assert_eq!(raw.decode().map(|e| e.key()), Some(60));
    }

    #[test]
    fn constructors_encode_channel() {
        let on = RawMidi::note_on(0, 9, 36, 90);
        assert_eq!(on.bytes(), &[0x99, 36, 90]);
        assert_eq!(on.decode().map(|e| e.channel()), Some(9));
        let off = RawMidi::note_off(0, 9, 36);
        assert!(matches!(off.decode(), Some(MidiEvent::NoteOff { key: 36, .. })));
    }
}
