//! Streaming mix timeline.
//!
//! The timeline holds only the open suffix of the piece: samples that a
//! later note could still add to. When a note starts after the current song
//! time, the gap up to its onset is rounded to whole samples and those
//! samples are final and go to the sink. Gaps past the end of the open buffer
//! are filled with silence.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cache::WaveformCache;
use crate::instrument::Instrument;
use crate::note::NoteEvent;
use crate::sink::SampleSink;

/// Attenuation applied to every note before it is added to the mix.
///
/// Together with the writer's two bits of headroom this lets several
/// overlapping notes sum without saturating.
pub const MIX_GAIN: f64 = 0.25;

/// Seconds of silence written before a song.
pub const SONG_LEAD_IN: f64 = 0.5;

/// Whether a render is a complete piece or a short preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// A complete piece, preceded by [`SONG_LEAD_IN`] seconds of silence.
    #[default]
    Song,
    /// A single note or chord, starting immediately.
    Preview,
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of note events mixed.
    pub notes: usize,
    /// Mono samples handed to the sink, lead-in included.
    pub samples_written: u64,
    /// Distinct waveforms rendered.
    pub cache_entries: usize,
}

/// Accumulates overlapping notes and flushes finished samples.
#[derive(Debug)]
pub struct Timeline {
    sample_rate: u32,
    /// Open samples, starting at `song_time`.
    open: VecDeque<f64>,
    /// Onset of the latest note that advanced the timeline.
    song_time: f64,
    /// Samples already handed to the sink.
    flushed: u64,
}

impl Timeline {
    /// Creates an empty timeline at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            open: VecDeque::new(),
            song_time: 0.0,
            flushed: 0,
        }
    }

    /// Samples already flushed.
    pub fn flushed_samples(&self) -> u64 {
        self.flushed
    }

    /// Samples still open for mixing.
    pub fn open_samples(&self) -> usize {
        self.open.len()
    }

    /// Time in seconds up to which the output is final.
    pub fn song_time(&self) -> f64 {
        self.song_time
    }

    /// Samples between the song time and `onset`, rounded to the nearest
    /// sample. Zero for onsets at or before the song time.
    pub fn gap_samples(&self, onset: f64) -> u64 {
        if onset <= self.song_time {
            return 0;
        }
        ((onset - self.song_time) * self.sample_rate as f64).round() as u64
    }

    /// Flushes the gap before `onset` and moves the song time to it.
    ///
    /// Each gap is rounded on its own, so onsets off the sample grid can
    /// land a sample earlier or later than `round(onset * rate)`. Onsets at
    /// or before the song time flush nothing; the note is then mixed at the
    /// current position since flushed samples cannot change.
    pub fn advance_to<S: SampleSink>(&mut self, onset: f64, sink: &mut S) -> Result<(), S::Error> {
        if onset <= self.song_time {
            if onset < self.song_time {
                debug!(
                    onset,
                    song_time = self.song_time,
                    "note starts before song time; mixing at current position"
                );
            }
            return Ok(());
        }

        let gap = self.gap_samples(onset);
        let ready = (gap.min(self.open.len() as u64)) as usize;
        if ready > 0 {
            let open = self.open.make_contiguous();
            sink.flush_samples(&open[..ready])?;
            self.open.drain(..ready);
        }

        let silence = gap - ready as u64;
        if silence > 0 {
            trace!(samples = silence, "filling gap with silence");
            write_silence(sink, silence, self.sample_rate)?;
        }

        self.flushed += gap;
        self.song_time = onset;
        Ok(())
    }

    /// Adds `waveform`, scaled by [`MIX_GAIN`], starting at the flushed point.
    pub fn overlay(&mut self, waveform: &[f64]) {
        for (i, &sample) in waveform.iter().enumerate() {
            let scaled = sample * MIX_GAIN;
            match self.open.get_mut(i) {
                Some(slot) => *slot += scaled,
                None => self.open.push_back(scaled),
            }
        }
    }

    /// Flushes every remaining open sample.
    pub fn finish<S: SampleSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        if !self.open.is_empty() {
            let open = self.open.make_contiguous();
            sink.flush_samples(open)?;
            self.flushed += self.open.len() as u64;
            self.open.clear();
        }
        Ok(())
    }
}

/// Writes `len` zero samples in chunks of at most one second.
pub fn write_silence<S: SampleSink>(sink: &mut S, len: u64, sample_rate: u32) -> Result<(), S::Error> {
    let chunk_len = len.min(sample_rate.max(1) as u64) as usize;
    let chunk = vec![0.0; chunk_len];

    let mut remaining = len;
    while remaining > 0 {
        let n = remaining.min(chunk_len as u64) as usize;
        sink.flush_samples(&chunk[..n])?;
        remaining -= n as u64;
    }
    Ok(())
}

/// Mixes `notes` in order and streams the result into `sink`.
///
/// Each note's waveform comes from `cache` and is added at its onset sample.
/// For [`RenderMode::Song`] a lead-in of [`SONG_LEAD_IN`] seconds of silence
/// precedes the first note; note onsets are measured from the end of it.
pub fn render<I, S>(
    notes: &[NoteEvent],
    cache: &mut WaveformCache<I>,
    mode: RenderMode,
    sink: &mut S,
) -> Result<RenderStats, S::Error>
where
    I: Instrument,
    S: SampleSink,
{
    let sample_rate = cache.sample_rate();
    let mut lead_in = 0;
    if mode == RenderMode::Song {
        lead_in = (SONG_LEAD_IN * sample_rate as f64).round() as u64;
        write_silence(sink, lead_in, sample_rate)?;
    }

    let mut timeline = Timeline::new(sample_rate);
    for note in notes {
        timeline.advance_to(note.onset, sink)?;
        timeline.overlay(cache.get(note.pitch));
    }
    timeline.finish(sink)?;

    Ok(RenderStats {
        notes: notes.len(),
        samples_written: lead_in + timeline.flushed_samples(),
        cache_entries: cache.len(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::note::Pitch;

    /// Constant amplitude per pitch: 1.0 for any tone, zero at `t == duration`.
    struct Gate;

    impl Instrument for Gate {
        fn sample(&self, pitch: Pitch, t: f64, duration: f64) -> Option<f64> {
            if t > duration {
                return None;
            }
            match pitch {
                Pitch::Tone(freq) if t < duration => Some(freq / 1000.0),
                _ => Some(0.0),
            }
        }
    }

    /// Sink that records the size of every flush.
    #[derive(Default)]
    struct Recording {
        samples: Vec<f64>,
        flushes: Vec<usize>,
    }

    impl SampleSink for Recording {
        type Error = std::convert::Infallible;

        fn flush_samples(&mut self, samples: &[f64]) -> Result<(), Self::Error> {
            self.flushes.push(samples.len());
            self.samples.extend_from_slice(samples);
            Ok(())
        }
    }

    fn render_preview(notes: &[NoteEvent], sample_rate: u32) -> Vec<f64> {
        let mut cache = WaveformCache::new(Gate, sample_rate);
        let mut out = Vec::new();
        render(notes, &mut cache, RenderMode::Preview, &mut out).unwrap();
        out
    }

    #[test]
    fn test_single_note_is_scaled() {
        let out = render_preview(&[NoteEvent::tone(0.0, 1000.0, 1.0)], 10);
        assert_eq!(out.len(), 11);
        assert!(out[..10].iter().all(|&s| s == 0.25));
        assert_eq!(out[10], 0.0);
    }

    #[test]
    fn test_gap_is_filled_with_silence() {
        let notes = [
            NoteEvent::tone(0.0, 500.0, 1.0),
            NoteEvent::tone(2.0, 1000.0, 1.0),
        ];
        let out = render_preview(&notes, 100);

        assert_eq!(out.len(), 200 + 101);
        assert!(out[..100].iter().all(|&s| s == 0.125));
        assert!(out[100..200].iter().all(|&s| s == 0.0));
        assert_eq!(out[200], 0.25);
    }

    #[test]
    fn test_simultaneous_notes_sum_scaled_contributions() {
        let notes = [
            NoteEvent::tone(0.0, 400.0, 1.0),
            NoteEvent::tone(0.0, 800.0, 1.0),
        ];
        let out = render_preview(&notes, 20);

        // 0.4 / 4 + 0.8 / 4, never the unscaled 1.2
        assert_eq!(out.len(), 21);
        for &s in &out[..20] {
            assert!((s - 0.3).abs() < 1e-12, "{}", s);
        }
    }

    #[test]
    fn test_overlapping_notes_mix_at_offset() {
        let notes = [
            NoteEvent::tone(0.0, 400.0, 1.0),
            NoteEvent::tone(0.5, 400.0, 1.0),
        ];
        let out = render_preview(&notes, 10);

        assert_eq!(out.len(), 5 + 11);
        assert!(out[..5].iter().all(|&s| (s - 0.1).abs() < 1e-12));
        assert!(out[5..10].iter().all(|&s| (s - 0.2).abs() < 1e-12));
        assert!(out[10..15].iter().all(|&s| (s - 0.1).abs() < 1e-12));
        assert_eq!(out[15], 0.0);
    }

    #[test]
    fn test_song_mode_prepends_unscaled_lead_in() {
        let mut cache = WaveformCache::new(Gate, 100);
        let mut out = Vec::new();
        let stats = render(
            &[NoteEvent::tone(0.0, 1000.0, 1.0)],
            &mut cache,
            RenderMode::Song,
            &mut out,
        )
        .unwrap();

        assert_eq!(out.len(), 50 + 101);
        assert!(out[..50].iter().all(|&s| s == 0.0));
        assert_eq!(out[50], 0.25);
        assert_eq!(
            stats,
            RenderStats {
                notes: 1,
                samples_written: 151,
                cache_entries: 1,
            }
        );
    }

    #[test]
    fn test_earlier_onset_mixes_at_current_position() {
        let notes = [
            NoteEvent::tone(1.0, 400.0, 1.0),
            NoteEvent::tone(0.5, 400.0, 1.0),
        ];
        let out = render_preview(&notes, 10);

        assert_eq!(out.len(), 10 + 11);
        assert!(out[..10].iter().all(|&s| s == 0.0));
        assert!(out[10..20].iter().all(|&s| (s - 0.2).abs() < 1e-12));
    }

    #[test]
    fn test_flushed_prefix_is_never_rewritten() {
        let mut cache = WaveformCache::new(Gate, 10);
        let mut sink = Recording::default();
        let notes = [
            NoteEvent::tone(0.0, 400.0, 1.0),
            NoteEvent::tone(0.3, 400.0, 1.0),
            NoteEvent::tone(0.3, 400.0, 1.0),
        ];
        render(&notes, &mut cache, RenderMode::Preview, &mut sink).unwrap();

        assert_eq!(sink.flushes, vec![3, 11]);
        assert!(sink.samples[..3].iter().all(|&s| (s - 0.1).abs() < 1e-12));
        assert!((sink.samples[3] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_long_silence_is_chunked_by_sample_rate() {
        let mut sink = Recording::default();
        write_silence(&mut sink, 25, 10).unwrap();
        assert_eq!(sink.flushes, vec![10, 10, 5]);
        assert!(sink.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_onset_rounds_to_nearest_sample() {
        let mut timeline = Timeline::new(3);
        let mut out = Vec::new();
        timeline.advance_to(1.0 / 3.0 + 1.0 / 3.0, &mut out).unwrap();
        assert_eq!(timeline.flushed_samples(), 2);
        assert_eq!(out.len(), 2);
        assert!((timeline.song_time() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_each_gap_rounds_from_song_time() {
        let mut cache = WaveformCache::new(Gate, 100);
        let mut sink = Recording::default();
        let notes = [
            NoteEvent::tone(0.0, 1000.0, 1.0),
            NoteEvent::tone(1.0 / 3.0, 1000.0, 1.0),
            NoteEvent::tone(2.0 / 3.0, 1000.0, 1.0),
        ];
        render(&notes, &mut cache, RenderMode::Preview, &mut sink).unwrap();

        // Gaps of round(33.3) each put the third onset at 66, not
        // round(66.7) = 67.
        assert_eq!(sink.flushes, vec![33, 33, 101]);
        assert_eq!(sink.samples[65], 0.5);
        assert_eq!(sink.samples[66], 0.75);
    }

    #[test]
    fn test_song_time_follows_onsets() {
        let mut timeline = Timeline::new(100);
        let mut out = Vec::new();
        timeline.advance_to(0.504, &mut out).unwrap();
        assert_eq!(timeline.gap_samples(1.0), 50);
        assert_eq!(timeline.gap_samples(0.2), 0);
        assert_eq!(timeline.song_time(), 0.504);
        assert_eq!(timeline.flushed_samples(), 50);
    }

    #[test]
    fn test_empty_score_produces_only_lead_in() {
        let mut cache = WaveformCache::new(Gate, 100);
        let mut out = Vec::new();
        let stats = render(&[], &mut cache, RenderMode::Song, &mut out).unwrap();
        assert_eq!(out, vec![0.0; 50]);
        assert_eq!(stats.cache_entries, 0);
    }
}
