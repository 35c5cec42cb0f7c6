//! mallet synthesis engine
//!
//! Turns an ordered list of [`NoteEvent`]s into one stream of normalized
//! amplitude samples and hands that stream to a [`SampleSink`], usually a
//! [`mallet_wav::WavWriter`].
//!
//! # Overview
//!
//! - [`instrument`] - the pluggable waveform-shape capability and the stock
//!   instruments.
//! - [`cache`] - memoizes one rendered waveform per distinct pitch.
//! - [`timeline`] - overlays waveforms at their onset sample and flushes the
//!   finished prefix to the sink as soon as no later note can touch it.
//! - [`sink`] - where flushed samples go.
//! - [`synthesizer`] - ties the pieces to a [`RenderOptions`] configuration.
//!
//! # Fixed note length
//!
//! Every note is rendered for [`NOTE_DURATION`] seconds regardless of the
//! duration carried by its [`NoteEvent`]; waveforms are cached by pitch only.
//!
//! # Preconditions
//!
//! Notes must arrive in onset order. An instrument must eventually return
//! `None` from [`Instrument::sample`]; one that never does makes rendering
//! loop forever.
//!
//! # Example
//!
//! ```
//! use mallet_synth::{NoteEvent, RenderMode, RenderOptions, Synthesizer};
//!
//! let options = RenderOptions {
//!     sample_rate: 8000,
//!     mode: RenderMode::Preview,
//!     ..RenderOptions::default()
//! };
//! let synth = Synthesizer::new(options)?;
//!
//! let notes = [NoteEvent::tone(0.0, 440.0, 1.0), NoteEvent::tone(0.5, 660.0, 1.0)];
//! let mut samples = Vec::new();
//! let stats = synth.render_into(&notes, &mut samples)?;
//!
//! assert_eq!(stats.cache_entries, 2);
//! assert_eq!(samples.len(), 4000 + 8001);
//! # Ok::<(), mallet_synth::SynthError>(())
//! ```

pub mod cache;
pub mod error;
pub mod instrument;
pub mod note;
pub mod sink;
pub mod synthesizer;
pub mod timeline;

// Re-export main types at crate root
pub use cache::{WaveformCache, NOTE_DURATION};
pub use error::{SynthError, SynthResult};
pub use instrument::{Instrument, InstrumentKind, Marimba, Mystery};
pub use note::{NoteEvent, Pitch};
pub use sink::SampleSink;
pub use synthesizer::{RenderOptions, Synthesizer};
pub use timeline::{
    render, write_silence, RenderMode, RenderStats, Timeline, MIX_GAIN, SONG_LEAD_IN,
};
