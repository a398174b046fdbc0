use crate::mml::{EncodeError, Result};

pub const SIXTEENTHS_PER_BEAT: f64 = 4.0;

/// Ticks-per-beat scaled by the speed multiplier. A speed above 1 makes every beat "longer" in
/// ticks, so the same tick delta maps to fewer sixteenths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    scaled_tpb: f64,
}

impl Quantizer {
    pub fn new(ticks_per_beat: u32, speed_mult: f64) -> Result<Self> {
        if ticks_per_beat == 0 || !speed_mult.is_finite() || speed_mult <= 0.0 {
            return Err(EncodeError::InvalidTiming {
                ticks_per_beat,
                speed_mult,
            });
        }

        Ok(Self {
            scaled_tpb: ticks_per_beat as f64 * speed_mult,
        })
    }

    pub fn sixteenths(&self, ticks: u32) -> Result<u32> {
        let units = (ticks as f64 / self.scaled_tpb * SIXTEENTHS_PER_BEAT).round();
        if !units.is_finite() || units > u32::MAX as f64 {
            return Err(EncodeError::TrackTooLong);
        }

        Ok(units as u32)
    }
}

/// Converts a tick delta to whole sixteenth notes, rounding half away from zero.
///
/// Each delta is rounded on its own, so rounding error is not carried across events.
pub fn ticks_to_sixteenths(ticks: u32, ticks_per_beat: u32, speed_mult: f64) -> Result<u32> {
    Quantizer::new(ticks_per_beat, speed_mult)?.sixteenths(ticks)
}
