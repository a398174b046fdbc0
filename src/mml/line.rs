use crate::mml::{EncodeError, Note, Result};
use log::debug;

/// One monophonic voice. Entries are back to back: every gap is filled with a rest, and a line
/// that starts late is seeded with a rest from time 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    start: u32,
    duration: u32,
    entries: Vec<Note>,
}

impl Line {
    pub fn new(start: u32) -> Self {
        let mut entries = Vec::new();
        if start > 0 {
            entries.push(Note::rest(0, start));
        }

        Self {
            start,
            duration: 0,
            entries,
        }
    }

    /// Never overflows: `append` only grows the line through a checked end.
    pub fn end(&self) -> u32 {
        self.start + self.duration
    }

    pub fn entries(&self) -> &[Note] {
        &self.entries
    }

    /// Appends `note`, closing any gap since the end of the line with a rest first.
    pub fn append(&mut self, note: Note) -> Result<()> {
        let end = self.end();
        if note.start > end {
            let gap = note.start - end;
            self.entries.push(Note::rest(end, gap));
            self.duration += gap;
        }

        let grown = self
            .end()
            .checked_add(note.duration)
            .ok_or(EncodeError::TrackTooLong)?;
        self.duration = grown - self.start;
        self.entries.push(note);

        Ok(())
    }

    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.encode()?);
        }
        Ok(out)
    }
}

/// Picks the most recently created line that is already free at `note.start`, or opens a new one.
///
/// This only reuses lines locally; it does not try to minimise the total number of lines.
pub fn available_line<'a>(lines: &'a mut Vec<Line>, note: &Note) -> &'a mut Line {
    let idx = match lines.iter().rposition(|line| line.end() <= note.start) {
        Some(idx) => idx,
        None => {
            debug!(
                "Opening line {} for a note starting at sixteenth {}..!",
                lines.len() + 1,
                note.start
            );
            lines.push(Line::new(note.start));
            lines.len() - 1
        }
    };

    &mut lines[idx]
}
