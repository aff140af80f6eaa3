// Purpose: note tracking, shared parameters, and the mono voice renderer
// This layer sits above the dsp primitives and turns MIDI into samples

pub mod message;
pub mod mono;
pub mod notes;
pub mod params;
