//! Render configuration and the top-level render entry points.

use std::io::{Seek, Write};
use std::path::Path;

use mallet_wav::{WavFormat, WavWriter};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::WaveformCache;
use crate::error::{SynthError, SynthResult};
use crate::instrument::InstrumentKind;
use crate::note::{NoteEvent, Pitch};
use crate::sink::SampleSink;
use crate::timeline::{render, RenderMode, RenderStats};

/// Render configuration.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs the settings it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channels (1 or 2). The mix is mono and duplicated into both
    /// channels for stereo.
    pub channels: u16,
    /// Bytes per sample (1 or 2).
    pub bytes_per_sample: u16,
    /// Song (with lead-in) or preview.
    pub mode: RenderMode,
    /// Waveform shape.
    pub instrument: InstrumentKind,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
            bytes_per_sample: 2,
            mode: RenderMode::Song,
            instrument: InstrumentKind::Marimba,
        }
    }
}

impl RenderOptions {
    /// Output container format for these options.
    pub fn format(&self) -> SynthResult<WavFormat> {
        Ok(WavFormat::new(
            self.channels,
            self.bytes_per_sample,
            self.sample_rate,
        )?)
    }
}

/// Renders note lists with a fixed configuration.
///
/// Every render call gets a fresh waveform cache.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    options: RenderOptions,
    format: WavFormat,
}

impl Synthesizer {
    /// Creates a synthesizer, validating the output format.
    pub fn new(options: RenderOptions) -> SynthResult<Self> {
        let format = options.format()?;
        Ok(Self { options, format })
    }

    /// Returns the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Returns the output container format.
    pub fn format(&self) -> WavFormat {
        self.format
    }

    /// Renders `notes` into a new WAV file at `path`.
    ///
    /// On error the partially written file is left behind with unpatched
    /// size fields and should be discarded.
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        notes: &[NoteEvent],
        path: P,
    ) -> SynthResult<RenderStats> {
        validate_notes(notes)?;
        let mut writer = WavWriter::create(path, self.format)?;
        let stats = self.render_validated(notes, &mut writer)?;
        writer.finalize()?;
        Ok(stats)
    }

    /// Renders `notes` as a WAV stream into `inner` and returns it.
    pub fn render_to_writer<W: Write + Seek>(
        &self,
        notes: &[NoteEvent],
        inner: W,
    ) -> SynthResult<(W, RenderStats)> {
        validate_notes(notes)?;
        let mut writer = WavWriter::new(inner, self.format)?;
        let stats = self.render_validated(notes, &mut writer)?;
        Ok((writer.finalize()?, stats))
    }

    /// Renders `notes` into any sample sink.
    pub fn render_into<S>(&self, notes: &[NoteEvent], sink: &mut S) -> SynthResult<RenderStats>
    where
        S: SampleSink,
        SynthError: From<S::Error>,
    {
        validate_notes(notes)?;
        self.render_validated(notes, sink)
    }

    /// Renders notes that already passed [`validate_notes`].
    fn render_validated<S>(&self, notes: &[NoteEvent], sink: &mut S) -> SynthResult<RenderStats>
    where
        S: SampleSink,
        SynthError: From<S::Error>,
    {
        let mut cache = WaveformCache::new(self.options.instrument, self.options.sample_rate);
        let stats = render(notes, &mut cache, self.options.mode, sink)?;

        info!(
            notes = stats.notes,
            samples = stats.samples_written,
            waveforms = stats.cache_entries,
            instrument = %self.options.instrument,
            "render complete"
        );
        Ok(stats)
    }
}

/// Rejects notes that cannot be placed on the timeline.
///
/// Musical content is not checked; only that onsets and frequencies are
/// usable numbers.
fn validate_notes(notes: &[NoteEvent]) -> SynthResult<()> {
    for (index, note) in notes.iter().enumerate() {
        if !note.onset.is_finite() || note.onset < 0.0 {
            return Err(SynthError::invalid_note(
                index,
                format!("onset must be a non-negative number, got {}", note.onset),
            ));
        }
        if let Pitch::Tone(freq) = note.pitch {
            if !freq.is_finite() || freq <= 0.0 {
                return Err(SynthError::invalid_note(
                    index,
                    format!("frequency must be positive, got {}", freq),
                ));
            }
        }
    }
    Ok(())
}
