//! MIDI event stream to jukebox MML.
//!
//! Events are quantized to sixteenth notes, paired off per pitch into notes, packed into
//! monophonic lines (polyphony spills into extra lines) and finally rendered as text.

mod line;
mod note;
mod quantize;
mod score;
mod track;

pub use line::*;
pub use note::*;
pub use quantize::*;
pub use score::*;
pub use track::*;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A note-off arrived for a pitch with no sounding note.
    #[error("Note-off for MIDI {note} at sixteenth {time} has no matching note-on..!")]
    MalformedEventStream { note: u8, time: u32 },

    #[error("Cannot notate a duration shorter than a sixteenth note ({0})..!")]
    InvalidDuration(u32),

    #[error("Invalid timing: {ticks_per_beat} ticks per beat at speed multiplier {speed_mult}..!")]
    InvalidTiming { ticks_per_beat: u32, speed_mult: f64 },

    /// The song runs past the largest representable sixteenth.
    #[error("Track is too long to encode (over {} sixteenths)..!", u32::MAX)]
    TrackTooLong,
}

pub type Result<T> = std::result::Result<T, EncodeError>;
