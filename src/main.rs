use JUKEBOX_MML::{Args, EncodeOptions, Score, import_midi_file, report_length};
use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::fs;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    );
    logger.init();

    let options = EncodeOptions::from(&args);

    info!("Importing MIDI file: '{}'...", args.midi.display());
    let track = import_midi_file(&args.midi)?;

    info!(
        "Successfully loaded '{}' and merged its tracks ({} events). Encoding now..!",
        track.title.as_deref().unwrap_or("<unknown>"),
        track.events.len()
    );

    if let Some(bpm) = track.tempo_bpm {
        debug!(
            "File declares ~{:.0} bpm, encoding at {} bpm (use --tempo to change it)..!",
            bpm, options.tempo
        );
    }

    let score = Score::from_import(track, &options)?;
    let code = score.encode()?;

    match &args.output {
        Some(path) => {
            fs::write(path, &code)
                .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
            info!("Wrote MML code to '{}'..!", path.display());
        }
        None => println!("{}", code),
    }

    report_length(&code);

    Ok(())
}
