use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::io::midi::RawMidi;

/// Where the renderer pulls pending MIDI from at the start of a block.
///
/// Implementations used from the audio callback must not block or allocate.
pub trait EventSource {
    fn pop(&mut self) -> Option<RawMidi>;
}

#[cfg(feature = "rtrb")]
impl EventSource for Consumer<RawMidi> {
    fn pop(&mut self) -> Option<RawMidi> {
        Consumer::pop(self).ok()
    }
}

/// Offline rendering and tests.
impl EventSource for VecDeque<RawMidi> {
    fn pop(&mut self) -> Option<RawMidi> {
        self.pop_front()
    }
}
