use crate::mml::{EncodeError, Line, Note, Quantizer, Result, available_line};
use crate::model::event::{EventKind, MidiEvent};
use log::{debug, warn};
use std::collections::BTreeMap;

pub const LINE_SEPARATOR: &str = ",";

/// A merged MIDI track, ready to be split into lines.
#[derive(Debug, Clone)]
pub struct Track {
    events: Vec<MidiEvent>,
    quantizer: Quantizer,
    disable_velocity: bool,
}

impl Track {
    pub fn new(
        events: Vec<MidiEvent>,
        ticks_per_beat: u32,
        speed_mult: f64,
        disable_velocity: bool,
    ) -> Result<Self> {
        Ok(Self {
            events,
            quantizer: Quantizer::new(ticks_per_beat, speed_mult)?,
            disable_velocity,
        })
    }

    /// Pairs note-ons with note-offs and packs the finished notes into lines.
    ///
    /// Same-pitch notes stack, so a note-off always closes the most recent note-on of its pitch.
    pub fn lines(&self) -> Result<Vec<Line>> {
        let mut sounding: BTreeMap<u8, Vec<Note>> = BTreeMap::new();
        let mut lines: Vec<Line> = Vec::new();
        let mut time: u32 = 0;

        for event in &self.events {
            let delta = self.quantizer.sixteenths(event.delta_ticks)?;
            time = time.checked_add(delta).ok_or(EncodeError::TrackTooLong)?;
            for note in sounding.values_mut().flatten() {
                note.duration = note
                    .duration
                    .checked_add(delta)
                    .ok_or(EncodeError::TrackTooLong)?;
            }

            if event.kind == EventKind::Other {
                continue;
            }

            if event.is_release() {
                let note = sounding
                    .get_mut(&event.note)
                    .and_then(|stack| stack.pop())
                    .ok_or(EncodeError::MalformedEventStream {
                        note: event.note,
                        time,
                    })?;

                if note.duration == 0 {
                    warn!(
                        "Zero-length note {} at sixteenth {} will be dropped..!",
                        event.note, note.start
                    );
                }

                available_line(&mut lines, &note).append(note)?;
            } else {
                sounding.entry(event.note).or_default().push(Note::new(
                    event.note,
                    event.velocity,
                    time,
                    self.disable_velocity,
                ));
            }
        }

        for (midi, stack) in sounding.iter() {
            for note in stack {
                warn!(
                    "Unclosed note-on for {} at sixteenth {}, dropping it..!",
                    midi, note.start
                );
            }
        }

        debug!(
            "Packed {} events into {} line(s) spanning {} sixteenths..!",
            self.events.len(),
            lines.len(),
            time
        );

        Ok(lines)
    }

    pub fn encode(&self) -> Result<String> {
        let encoded = self
            .lines()?
            .iter()
            .map(Line::encode)
            .collect::<Result<Vec<_>>>()?;

        Ok(encoded.join(LINE_SEPARATOR))
    }
}
