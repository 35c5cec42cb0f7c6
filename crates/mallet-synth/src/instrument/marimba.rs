//! Marimba-like tone: a strong fundamental, faint sub-octave and overtones,
//! decaying exponentially to zero at the end of the note.

use std::f64::consts::PI;

use super::Instrument;
use crate::note::Pitch;

/// Marimba-like instrument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marimba;

impl Instrument for Marimba {
    fn sample(&self, pitch: Pitch, t: f64, duration: f64) -> Option<f64> {
        if t > duration {
            return None;
        }

        let Pitch::Tone(freq) = pitch else {
            return Some(0.0);
        };

        let angle = 2.0 * PI * freq * t;
        let partials = (angle / 2.0).sin() / 64.0
            + angle.sin()
            + (angle * 2.0).sin() / 32.0
            + (angle * 4.0).sin() / 64.0;

        // (8^(1 - t/d) - 1) / 7 falls from 1 at onset to 0 at t = d
        let decay = (8.0_f64.powf(1.0 - t / duration) - 1.0) / 7.0;

        Some(partials * decay)
    }
}
