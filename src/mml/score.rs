use crate::mml::{Result, Track};
use crate::model::config::{DEFAULT_TEMPO, EncodeOptions};
use crate::model::event::ImportedTrack;

pub const HEADER: &str = "7ML@";
pub const TERMINATOR: char = ';';

/// A whole jukebox code: header, optional tempo, every line of the track, terminator.
#[derive(Debug, Clone)]
pub struct Score {
    tempo: u32,
    track: Track,
}

impl Score {
    pub fn new(tempo: u32, track: Track) -> Self {
        Self { tempo, track }
    }

    pub fn from_import(imported: ImportedTrack, options: &EncodeOptions) -> Result<Self> {
        let track = Track::new(
            imported.events,
            imported.ticks_per_beat,
            options.speed_mult,
            options.disable_velocity,
        )?;

        Ok(Self::new(options.tempo, track))
    }

    pub fn encode(&self) -> Result<String> {
        let mut out = String::from(HEADER);
        if self.tempo != DEFAULT_TEMPO {
            out.push_str(&format!("T{}", self.tempo));
        }
        out.push_str(&self.track.encode()?);
        out.push(TERMINATOR);

        Ok(out)
    }
}
