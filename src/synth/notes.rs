use crate::NOTE_COUNT;

/*
Held-Note Registry
==================

A monophonic synth still has to remember every key that is down: when the
sounding key is released, the voice falls back to another held key instead
of going silent.

Storage is a fixed arena of 128 slots, one per possible note, so even with
every key held there is always room. Each slot is either empty or holds one
note number; a note never occupies two slots.

  insert   Write the note into the next free slot at or after a round-robin
           cursor, then move the cursor past it. Inserting a held note does
           nothing, cursor included.

  remove   Empty the slot holding the note, if any.

  highest  Scan all slots and return the largest held note. This is the
           note-priority rule: the highest key always sounds, and releasing
           it reveals the next-highest key still held.

Every operation is a bounded scan over 128 bytes, no allocation.
*/

/// Fixed-capacity set of held MIDI note numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRegistry {
    slots: [Option<u8>; NOTE_COUNT],
    cursor: usize,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self {
            slots: [None; NOTE_COUNT],
            cursor: 0,
        }
    }

    /// Add `note`. Returns `false` when it was already held or is not a
    /// valid note number.
    pub fn insert(&mut self, note: u8) -> bool {
        if note as usize >= NOTE_COUNT || self.contains(note) {
            return false;
        }

        // Fewer than 128 notes are held here, so a free slot exists.
        for offset in 0..NOTE_COUNT {
            let index = (self.cursor + offset) % NOTE_COUNT;
            if self.slots[index].is_none() {
                self.slots[index] = Some(note);
                self.cursor = (index + 1) % NOTE_COUNT;
                return true;
            }
        }

        false
    }

    /// Release `note`. Returns `false` when it was not held.
    pub fn remove(&mut self, note: u8) -> bool {
        match self.position(note) {
            Some(index) => {
                self.slots[index] = None;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, note: u8) -> bool {
        self.position(note).is_some()
    }

    /// The highest held note, `None` when nothing is held.
    pub fn highest(&self) -> Option<u8> {
        self.slots.iter().flatten().copied().max()
    }

    pub fn is_empty(&self) -> bool {
        self.highest().is_none()
    }

    /// Number of held notes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Slot index the next insert starts probing from.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Held notes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Forget every held note. The cursor keeps its position.
    pub fn clear(&mut self) {
        self.slots = [None; NOTE_COUNT];
    }

    fn position(&self, note: u8) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(note))
    }
}

impl Default for NoteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
