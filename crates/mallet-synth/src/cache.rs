//! Per-pitch waveform memoization.

use std::collections::HashMap;

use tracing::debug;

use crate::instrument::Instrument;
use crate::note::Pitch;

/// Length in seconds every note is rendered for.
pub const NOTE_DURATION: f64 = 1.0;

/// Cache key: the frequency's bit pattern, or `None` for silence.
type CacheKey = Option<u64>;

fn cache_key(pitch: Pitch) -> CacheKey {
    pitch.frequency().map(f64::to_bits)
}

/// Memoizes the waveform rendered for each distinct pitch.
///
/// The cache lives for one render and is never evicted; the number of
/// distinct pitches in a score is small.
#[derive(Debug)]
pub struct WaveformCache<I> {
    instrument: I,
    sample_rate: u32,
    entries: HashMap<CacheKey, Vec<f64>>,
}

impl<I: Instrument> WaveformCache<I> {
    /// Creates an empty cache rendering with `instrument` at `sample_rate`.
    pub fn new(instrument: I, sample_rate: u32) -> Self {
        Self {
            instrument,
            sample_rate,
            entries: HashMap::new(),
        }
    }

    /// Returns the waveform for `pitch`, rendering it on first request.
    pub fn get(&mut self, pitch: Pitch) -> &[f64] {
        let instrument = &self.instrument;
        let sample_rate = self.sample_rate;
        self.entries.entry(cache_key(pitch)).or_insert_with(|| {
            let waveform = synthesize(instrument, pitch, sample_rate);
            debug!(?pitch, samples = waveform.len(), "rendered waveform");
            waveform
        })
    }

    /// Returns true if `pitch` has already been rendered.
    pub fn contains(&self, pitch: Pitch) -> bool {
        self.entries.contains_key(&cache_key(pitch))
    }

    /// Number of cached waveforms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been rendered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sample rate waveforms are rendered at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the instrument.
    pub fn instrument(&self) -> &I {
        &self.instrument
    }
}

/// Samples `instrument` at every tick until it reports the note is over.
fn synthesize<I: Instrument>(instrument: &I, pitch: Pitch, sample_rate: u32) -> Vec<f64> {
    let rate = sample_rate as f64;
    let mut samples = Vec::with_capacity((rate * NOTE_DURATION) as usize + 1);

    let mut i: u64 = 0;
    while let Some(value) = instrument.sample(pitch, i as f64 / rate, NOTE_DURATION) {
        samples.push(value);
        i += 1;
    }

    samples
}
