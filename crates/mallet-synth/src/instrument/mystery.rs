//! Bell-like tone built from partials with `x^-x` envelopes.

use std::f64::consts::PI;

use super::Instrument;
use crate::note::Pitch;

// Envelope divisors for the sub-octave, fundamental and overtone partials.
const SUB_NORM: f64 = 1.13498;
const FUNDAMENTAL_NORM: f64 = 1.2421;
const OVERTONE_NORM: f64 = 1.32825;

/// Experimental bell-like instrument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mystery;

impl Instrument for Mystery {
    fn sample(&self, pitch: Pitch, t: f64, duration: f64) -> Option<f64> {
        if t > duration {
            return None;
        }

        let Pitch::Tone(freq) = pitch else {
            return Some(0.0);
        };

        let angle = 2.0 * PI * freq * t;

        let a0 = t.powf(-t) / SUB_NORM;
        let a1 = (2.0 * t).powf(-2.0 * t) / FUNDAMENTAL_NORM;
        let a2 = (4.0 * t).powf(-4.0 * t) / OVERTONE_NORM;

        let note = (angle / 2.0).sin() * a0 / 64.0
            + angle.sin() * a1
            + (angle * 2.0).sin() * a2 / 16.0
            + (angle * 4.0).sin() * a2 / 32.0;

        Some(note * (duration - t))
    }
}
