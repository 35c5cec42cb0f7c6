//! Error types for the synthesis engine.

use std::convert::Infallible;

use mallet_wav::WavError;
use thiserror::Error;

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors that can occur while rendering notes.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A note event cannot be placed on the timeline.
    #[error("invalid note #{index}: {message}")]
    InvalidNote {
        /// Position of the note in the input.
        index: usize,
        /// Error message.
        message: String,
    },

    /// Error from the WAV writer.
    #[error(transparent)]
    Wav(#[from] WavError),
}

impl SynthError {
    /// Creates an invalid note error.
    pub fn invalid_note(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidNote {
            index,
            message: message.into(),
        }
    }
}

impl From<Infallible> for SynthError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
