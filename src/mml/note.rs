use crate::mml::{EncodeError, Result};

/// Velocity bucket that the jukebox plays at when no `V` command is given.
pub const NEUTRAL_VELOCITY: u8 = 12;
pub const MAX_VELOCITY: u8 = 15;

pub const REST_SYMBOL: &str = "R";
pub const TIE: char = '&';

/// Notatable lengths in sixteenths, ascending. A quarter note is the implicit default length.
const LENGTHS: &[(u32, &str)] = &[
    (1, "16"),
    (2, "8"),
    (3, "8."),
    (4, ""),
    (6, "4."),
    (8, "2"),
    (12, "2."),
    (16, "1"),
    (24, "1."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    pub fn from_midi(midi: u8) -> Self {
        Self::ALL[(midi % 12) as usize]
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Sounding {
        pitch: PitchClass,
        octave: i8,
        velocity: u8,
    },
    Silent,
}

/// A note or rest placed on the sixteenth-note grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub sound: Sound,
    pub start: u32,
    pub duration: u32,
}

impl Note {
    /// A sounding note with no length yet; the track encoder grows it until its note-off.
    pub fn new(midi: u8, velocity: u8, start: u32, disable_velocity: bool) -> Self {
        let velocity = if disable_velocity {
            NEUTRAL_VELOCITY
        } else {
            velocity_bucket(velocity)
        };

        Self {
            sound: Sound::Sounding {
                pitch: PitchClass::from_midi(midi),
                octave: (midi / 12) as i8 - 1,
                velocity,
            },
            start,
            duration: 0,
        }
    }

    pub fn rest(start: u32, duration: u32) -> Self {
        Self {
            sound: Sound::Silent,
            start,
            duration,
        }
    }

    pub fn end(&self) -> Result<u32> {
        self.start
            .checked_add(self.duration)
            .ok_or(EncodeError::TrackTooLong)
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.sound, Sound::Silent)
    }

    /// Symbol repeated after each tie, e.g. `C#` or `R`.
    pub fn symbol(&self) -> &'static str {
        match self.sound {
            Sound::Sounding { pitch, .. } => pitch.symbol(),
            Sound::Silent => REST_SYMBOL,
        }
    }

    /// Renders this note as an MML token. Zero-length notes render as nothing.
    pub fn encode(&self) -> Result<String> {
        if self.duration == 0 {
            return Ok(String::new());
        }

        let mut out = String::new();
        if let Sound::Sounding {
            octave, velocity, ..
        } = self.sound
        {
            if velocity != NEUTRAL_VELOCITY {
                out.push_str(&format!("V{}", velocity));
            }
            out.push_str(&format!("O{}", octave));
        }

        out.push_str(self.symbol());
        out.push_str(&encode_length(self.duration, self.symbol())?);

        Ok(out)
    }
}

/// Scales a 0..=127 MIDI velocity down to the jukebox's 0..=15 range.
pub fn velocity_bucket(velocity: u8) -> u8 {
    let scaled = (velocity as f64 * (16.0 / 128.0)).round() as u8;
    scaled.min(MAX_VELOCITY)
}

/// Splits a duration into notatable lengths, greedily taking the largest table entry that fits.
///
/// Greedy is not always the shortest tie chain, but it is the established output and is kept
/// as-is so identical songs keep producing identical codes.
pub fn decompose(duration: u32) -> Result<Vec<(u32, &'static str)>> {
    if duration < 1 {
        return Err(EncodeError::InvalidDuration(duration));
    }

    let mut parts = Vec::new();
    let mut remaining = duration;
    for &(length, token) in LENGTHS.iter().rev() {
        while remaining >= length {
            parts.push((length, token));
            remaining -= length;
        }
    }

    Ok(parts)
}

/// Length suffix for `duration` sixteenths; longer values become a tie chain of `symbol`.
pub fn encode_length(duration: u32, symbol: &str) -> Result<String> {
    let parts = decompose(duration)?;
    let joiner = format!("{}{}", TIE, symbol);

    Ok(parts
        .iter()
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(&joiner))
}
