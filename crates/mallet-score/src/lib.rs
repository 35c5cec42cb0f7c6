//! mallet score notation
//!
//! Parses the plain-text score format into timed
//! [`NoteEvent`](mallet_synth::NoteEvent)s.
//!
//! # Format
//!
//! A score starts with optional note families, one letter each, listing the
//! frequencies of one octave:
//!
//! ```text
//! c: 261.63 293.66 329.63 349.23 392 440 493.88
//! ```
//!
//! followed by instructions separated by whitespace:
//!
//! - `speed: 2` - steps per second from here on (default 1).
//! - `c4` - note 4 of family `c`; `c4+3` holds it for three steps.
//! - `( c0 c2 c4 )` - a chord; its notes share one onset.
//! - `.` - a rest.
//!
//! Note `i` of a family with `n` frequencies is `freq[i % n] * 2^(i / n)`, so
//! indexes past the first octave climb octaves. Every note, chord and rest
//! takes one step of `1 / speed` seconds; a note's nominal duration is
//! `beats / speed`.
//!
//! # Example
//!
//! ```
//! use mallet_score::parse_score;
//!
//! let score = parse_score("a: 220 330\nspeed: 2\na0 a3 . (a0 a1)")?;
//! let onsets: Vec<f64> = score.notes.iter().map(|n| n.onset).collect();
//! assert_eq!(onsets, vec![0.0, 0.5, 1.5, 1.5]);
//! assert_eq!(score.notes[1].pitch.frequency(), Some(660.0));
//! # Ok::<(), mallet_score::ScoreError>(())
//! ```

pub mod error;
pub mod parser;

pub use error::{ScoreError, ScoreResult};
pub use parser::{parse_score, Score};
