//! Error types for the WAV codec.

use thiserror::Error;

/// Result type for WAV operations.
pub type WavResult<T> = Result<T, WavError>;

/// Errors that can occur while writing or reading a WAV container.
#[derive(Debug, Error)]
pub enum WavError {
    /// Invalid stream parameter supplied when opening a writer.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A chunk identifier did not match the expected four-character code.
    #[error("bad {chunk} chunk id: expected {expected:?}, found {found:?}")]
    BadChunkId {
        /// Which header field was being checked.
        chunk: &'static str,
        /// Expected four-character code.
        expected: [u8; 4],
        /// Bytes found in the file.
        found: [u8; 4],
    },

    /// The `fmt ` sub-chunk is not the 16-byte PCM layout.
    #[error("unsupported fmt chunk size: {0} (expected 16)")]
    UnsupportedFormatChunkSize(u32),

    /// The audio format code is not uncompressed linear PCM.
    #[error("unsupported audio format code: {0} (only PCM = 1 is supported)")]
    UnsupportedAudioFormat(u16),

    /// Channel count other than mono or stereo.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    /// Bits per sample other than 8 or 16.
    #[error("unsupported bits per sample: {0}")]
    UnsupportedBitDepth(u16),

    /// The payload no longer fits the 32-bit RIFF size fields.
    #[error("data too large for a RIFF container: {bytes} bytes")]
    DataTooLarge {
        /// Total number of bytes written so far.
        bytes: u64,
    },

    /// I/O error, including short reads and writes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WavError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors caused by malformed or unsupported container contents.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            WavError::BadChunkId { .. }
                | WavError::UnsupportedFormatChunkSize(_)
                | WavError::UnsupportedAudioFormat(_)
                | WavError::UnsupportedChannels(_)
                | WavError::UnsupportedBitDepth(_)
        )
    }

    /// Stable error code for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            WavError::InvalidParameter { .. } => "WAV_001",
            WavError::BadChunkId { .. } => "WAV_002",
            WavError::UnsupportedFormatChunkSize(_) => "WAV_003",
            WavError::UnsupportedAudioFormat(_) => "WAV_004",
            WavError::UnsupportedChannels(_) => "WAV_005",
            WavError::UnsupportedBitDepth(_) => "WAV_006",
            WavError::DataTooLarge { .. } => "WAV_007",
            WavError::Io(_) => "WAV_008",
        }
    }
}
