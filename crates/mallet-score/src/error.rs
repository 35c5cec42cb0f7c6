//! Error types for score parsing.

use thiserror::Error;

/// Result type for score parsing.
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Errors that can occur while parsing a score. Offsets are byte offsets
/// into the trimmed input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("unexpected input at offset {offset}: '{found}'")]
    UnexpectedInput { offset: usize, found: String },
    #[error("note family '{name}' used at offset {offset} is not defined")]
    UnknownFamily { name: char, offset: usize },
    #[error("note family '{name}' lists no frequencies")]
    EmptyFamily { name: char },
    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[error("chord opened at offset {offset} is not closed")]
    UnclosedChord { offset: usize },
    #[error("speed must be greater than zero, got {speed} at offset {offset}")]
    InvalidSpeed { speed: f64, offset: usize },
}
