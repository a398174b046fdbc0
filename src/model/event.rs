use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    /// Anything that is not a note message. Still carries a delta, so it still advances time.
    Other,
}

/// One event of the merged track, with its time expressed relative to the previous event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub kind: EventKind,
    pub note: u8,
    pub velocity: u8,
    pub delta_ticks: u32,
}

impl MidiEvent {
    pub fn note_on(note: u8, velocity: u8, delta_ticks: u32) -> Self {
        Self {
            kind: EventKind::NoteOn,
            note,
            velocity,
            delta_ticks,
        }
    }

    pub fn note_off(note: u8, delta_ticks: u32) -> Self {
        Self {
            kind: EventKind::NoteOff,
            note,
            velocity: 0,
            delta_ticks,
        }
    }

    pub fn other(delta_ticks: u32) -> Self {
        Self {
            kind: EventKind::Other,
            note: 0,
            velocity: 0,
            delta_ticks,
        }
    }

    /// Note-on with velocity 0 is the usual running-status shorthand for note-off.
    pub fn is_release(&self) -> bool {
        match self.kind {
            EventKind::NoteOff => true,
            EventKind::NoteOn => self.velocity == 0,
            EventKind::Other => false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportedTrack {
    pub title: Option<String>,
    pub ticks_per_beat: u32,
    pub tempo_bpm: Option<f64>,
    pub events: Vec<MidiEvent>,
}
