use crate::model::event::{ImportedTrack, MidiEvent};
use anyhow::{Result, anyhow};
use log::debug;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::fs;
use std::path::Path;

const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;

pub fn import_midi_file<P: AsRef<Path>>(path: P) -> Result<ImportedTrack> {
    let bytes = fs::read(path.as_ref()).map_err(|e| {
        anyhow!(
            "Failed to read MIDI file {}: {}",
            path.as_ref().display(),
            e
        )
    })?;

    midi_bytes_to_track(&bytes, path.as_ref())
}

/// Parses a Standard MIDI File and merges all of its tracks into one chronological stream.
///
/// Events sharing a tick keep their track order. End-of-track markers are dropped, their time
/// folds into whatever event comes next.
pub fn midi_bytes_to_track(bytes: &[u8], source_path: &Path) -> Result<ImportedTrack> {
    let smf = Smf::parse(bytes).map_err(|e| anyhow!("Failed to parse MIDI: {:?}", e))?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(t) => t.as_int() as u32,
        Timing::Timecode(_fps, _subframe) => {
            return Err(anyhow!(
                "SMPTE timecode midi timing is not currently supported..!"
            ));
        }
    };

    debug!("Ticks per quarter note: {}", ticks_per_beat);
    debug!(
        "MIDI format: {:?}, tracks: {}",
        smf.header.format,
        smf.tracks.len()
    );

    let mut title: Option<String> = None;
    let mut tempo_bpm: Option<f64> = None;
    let mut timeline: Vec<(u64, MidiEvent)> = Vec::new();

    for (track_idx, track) in smf.tracks.iter().enumerate() {
        let mut abs_tick: u64 = 0;
        for event in track.iter() {
            abs_tick = abs_tick.saturating_add(event.delta.as_int() as u64);

            let merged = match &event.kind {
                TrackEventKind::Meta(MetaMessage::EndOfTrack) => continue,
                TrackEventKind::Meta(MetaMessage::Tempo(micro)) => {
                    if tempo_bpm.is_none() {
                        let bpm = MICROSECONDS_PER_MINUTE / micro.as_int() as f64;
                        debug!(
                            "Tempo at tick {} -> {:.2} bpm (track {})",
                            abs_tick, bpm, track_idx
                        );
                        tempo_bpm = Some(bpm);
                    }
                    MidiEvent::other(0)
                }
                TrackEventKind::Meta(MetaMessage::TrackName(bytes)) => {
                    let name = String::from_utf8_lossy(bytes);
                    let name = name.trim_end_matches('\0').trim();
                    if title.is_none() && !name.is_empty() {
                        debug!("Track name: {}", name);
                        title = Some(name.to_string());
                    }
                    MidiEvent::other(0)
                }
                TrackEventKind::Midi { message, .. } => match message {
                    MidiMessage::NoteOn { key, vel } => {
                        MidiEvent::note_on(key.as_int(), vel.as_int(), 0)
                    }
                    MidiMessage::NoteOff { key, .. } => MidiEvent::note_off(key.as_int(), 0),
                    _ => MidiEvent::other(0),
                },
                _ => MidiEvent::other(0),
            };

            timeline.push((abs_tick, merged));
        }
    }

    // stable, so simultaneous events stay in track order
    timeline.sort_by_key(|(tick, _)| *tick);

    let mut last_tick: u64 = 0;
    let mut events: Vec<MidiEvent> = Vec::with_capacity(timeline.len());
    for (tick, mut event) in timeline.into_iter() {
        event.delta_ticks = u32::try_from(tick - last_tick).map_err(|_| {
            anyhow!(
                "Delta of {} ticks at tick {} is too large..!",
                tick - last_tick,
                tick
            )
        })?;
        last_tick = tick;
        events.push(event);
    }

    debug!("Merged {} events across all tracks..!", events.len());

    let title = title.or_else(|| {
        source_path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
    });

    Ok(ImportedTrack {
        title,
        ticks_per_beat,
        tempo_bpm,
        events,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mml::Score;
    use crate::model::config::EncodeOptions;
    use crate::model::event::EventKind;
    use midly::{Format, Fps, Header, TrackEvent};

    fn midi(delta: u32, message: MidiMessage) -> TrackEvent<'static> {
        TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Midi {
                channel: 0u8.into(),
                message,
            },
        }
    }

    fn on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
        midi(
            delta,
            MidiMessage::NoteOn {
                key: key.into(),
                vel: vel.into(),
            },
        )
    }

    fn off(delta: u32, key: u8) -> TrackEvent<'static> {
        midi(
            delta,
            MidiMessage::NoteOff {
                key: key.into(),
                vel: 0u8.into(),
            },
        )
    }

    fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
        TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Meta(message),
        }
    }

    fn write(timing: Timing, tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
        let smf = Smf {
            header: Header {
                format: Format::Parallel,
                timing,
            },
            tracks,
        };

        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();
        bytes
    }

    fn two_voice_song() -> Vec<u8> {
        let conductor = vec![
            meta(0, MetaMessage::TrackName(b"Duet")),
            meta(0, MetaMessage::Tempo(400_000u32.into())),
            meta(0, MetaMessage::EndOfTrack),
        ];
        let melody = vec![
            on(0, 72, 96),
            off(480, 72),
            on(0, 74, 96),
            off(480, 74),
            meta(0, MetaMessage::EndOfTrack),
        ];
        let bass = vec![
            on(0, 48, 96),
            on(960, 48, 0),
            meta(0, MetaMessage::EndOfTrack),
        ];

        write(Timing::Metrical(480u16.into()), vec![conductor, melody, bass])
    }

    #[test]
    fn merges_tracks_chronologically() {
        env_logger::try_init().unwrap_or(());

        let track = midi_bytes_to_track(&two_voice_song(), Path::new("duet.mid")).unwrap();
        assert_eq!(track.ticks_per_beat, 480);
        assert_eq!(track.title.as_deref(), Some("Duet"));
        assert!((track.tempo_bpm.unwrap() - 150.0).abs() < 1e-9);

        let notes: Vec<(EventKind, u8, u8, u32)> = track
            .events
            .iter()
            .filter(|e| e.kind != EventKind::Other)
            .map(|e| (e.kind, e.note, e.velocity, e.delta_ticks))
            .collect();

        assert_eq!(
            notes,
            vec![
                (EventKind::NoteOn, 72, 96, 0),
                (EventKind::NoteOn, 48, 96, 0),
                (EventKind::NoteOff, 72, 0, 480),
                (EventKind::NoteOn, 74, 96, 0),
                (EventKind::NoteOff, 74, 0, 480),
                (EventKind::NoteOn, 48, 0, 0),
            ]
        );

        let total: u32 = track.events.iter().map(|e| e.delta_ticks).sum();
        assert_eq!(total, 960);
    }

    #[test]
    fn merged_song_encodes() {
        env_logger::try_init().unwrap_or(());

        let track = midi_bytes_to_track(&two_voice_song(), Path::new("duet.mid")).unwrap();
        let score = Score::from_import(track, &EncodeOptions::default()).unwrap();
        assert_eq!(score.encode().unwrap(), "7ML@O5CO5D,O3C2;");
    }

    #[test]
    fn falls_back_to_file_name() {
        env_logger::try_init().unwrap_or(());

        let bytes = write(
            Timing::Metrical(96u16.into()),
            vec![vec![
                on(0, 60, 64),
                off(96, 60),
                meta(0, MetaMessage::EndOfTrack),
            ]],
        );
        let track = midi_bytes_to_track(&bytes, Path::new("songs/tune.mid")).unwrap();

        assert_eq!(track.title.as_deref(), Some("tune.mid"));
        assert_eq!(track.tempo_bpm, None);
        assert_eq!(track.ticks_per_beat, 96);
        assert_eq!(track.events.len(), 2);
    }

    #[test]
    fn rejects_smpte_timing() {
        env_logger::try_init().unwrap_or(());

        let bytes = write(
            Timing::Timecode(Fps::Fps25, 40),
            vec![vec![
                on(0, 60, 64),
                off(40, 60),
                meta(0, MetaMessage::EndOfTrack),
            ]],
        );
        assert!(midi_bytes_to_track(&bytes, Path::new("smpte.mid")).is_err());
    }

    #[test]
    fn rejects_garbage() {
        env_logger::try_init().unwrap_or(());

        assert!(midi_bytes_to_track(b"definitely not a midi file", Path::new("x.mid")).is_err());
        assert!(import_midi_file("./does/not/exist.mid").is_err());
    }
}
