//! Waveform-shape capability and the stock instruments.
//!
//! An [`Instrument`] maps elapsed time since onset to an amplitude. It is
//! sampled at `t = i / sample_rate` for `i = 0, 1, ...` until it returns
//! `None`, which it must do once `t` passes the note duration.

mod marimba;
mod mystery;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::note::Pitch;

pub use marimba::Marimba;
pub use mystery::Mystery;

/// Pluggable waveform shape.
pub trait Instrument {
    /// Returns the amplitude `t` seconds after onset, or `None` once
    /// `t > duration`.
    ///
    /// Amplitudes are normalized to roughly `[-1.0, 1.0]`. [`Pitch::Silence`]
    /// yields `Some(0.0)` for the whole duration.
    fn sample(&self, pitch: Pitch, t: f64, duration: f64) -> Option<f64>;
}

/// Selects one of the stock instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    /// Four sine partials with an exponential decay.
    #[default]
    Marimba,
    /// Partials with self-power envelopes and a linear fade.
    Mystery,
}

impl InstrumentKind {
    /// Returns the lowercase name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Marimba => "marimba",
            InstrumentKind::Mystery => "mystery",
        }
    }
}

impl Instrument for InstrumentKind {
    fn sample(&self, pitch: Pitch, t: f64, duration: f64) -> Option<f64> {
        match self {
            InstrumentKind::Marimba => Marimba.sample(pitch, t, duration),
            InstrumentKind::Mystery => Mystery.sample(pitch, t, duration),
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marimba" => Ok(InstrumentKind::Marimba),
            "mystery" => Ok(InstrumentKind::Mystery),
            other => Err(format!(
                "unknown instrument '{}' (expected marimba or mystery)",
                other
            )),
        }
    }
}
