use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_TEMPO: u32 = 120;
pub const DEFAULT_SPEED_MULT: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(
    name = "JUKEBOX_MML",
    about = "Convert a .midi (or .mid) file into an MML code for the Grand Cross jukebox!"
)]
pub struct Args {
    /// Path to the target MIDI file.
    pub midi: PathBuf,

    /// Song tempo (BPM). The tempo stored in the MIDI file is not carried over automatically.
    #[arg(short, long, default_value_t = DEFAULT_TEMPO)]
    pub tempo: u32,

    /// Disables note velocity, so all notes have the same volume.
    #[arg(short, long = "disable-vel", default_value_t = false)]
    pub disable_vel: bool,

    /// Scale the duration of all notes. Lower than 1 = slower, greater than 1 = faster.
    /// Ex: 2.0 turns halves into quarters, quarters into eighths, etc.
    #[arg(short, long = "speed-mult", default_value_t = DEFAULT_SPEED_MULT)]
    pub speed_mult: f64,

    /// Write the MML code to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prints extra information to the terminal.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Knobs for a single conversion run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions {
    pub tempo: u32,
    pub disable_velocity: bool,
    pub speed_mult: f64,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            disable_velocity: false,
            speed_mult: DEFAULT_SPEED_MULT,
        }
    }
}

impl From<&Args> for EncodeOptions {
    fn from(args: &Args) -> Self {
        Self {
            tempo: args.tempo,
            disable_velocity: args.disable_vel,
            speed_mult: args.speed_mult,
        }
    }
}
