//! WAV stream parameters and fixed header layout.

use crate::error::{WavError, WavResult};

/// Size of the canonical RIFF/WAVE header in bytes.
pub const HEADER_SIZE: u64 = 44;

/// Size of the PCM `fmt ` sub-chunk body.
pub const FORMAT_CHUNK_SIZE: u32 = 16;

/// Audio format code for uncompressed linear PCM.
pub const PCM_FORMAT: u16 = 1;

/// Bits of headroom kept below the integer range when scaling samples.
///
/// Two bits means a normalized `1.0` lands at a quarter of full scale, so up to
/// four full-amplitude voices can be summed before the encoder saturates.
pub const HEADROOM_BITS: u32 = 2;

/// Container tag.
pub const TAG_RIFF: [u8; 4] = *b"RIFF";
/// Format tag.
pub const TAG_WAVE: [u8; 4] = *b"WAVE";
/// Format sub-chunk tag.
pub const TAG_FMT: [u8; 4] = *b"fmt ";
/// Data sub-chunk tag.
pub const TAG_DATA: [u8; 4] = *b"data";

/// Byte offset of the RIFF size field.
pub(crate) const RIFF_SIZE_OFFSET: u64 = 4;
/// Byte offset of the data sub-chunk size field.
pub(crate) const DATA_SIZE_OFFSET: u64 = 40;

/// WAV stream parameters, fixed for the lifetime of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Bytes per sample per channel (1 = 8-bit, 2 = 16-bit).
    pub bytes_per_sample: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WavFormat {
    /// Creates a validated format.
    ///
    /// # Errors
    /// Returns [`WavError::InvalidParameter`] if `channels` is not 1 or 2,
    /// `bytes_per_sample` is not 1 or 2, or `sample_rate` is zero.
    pub fn new(channels: u16, bytes_per_sample: u16, sample_rate: u32) -> WavResult<Self> {
        let format = Self {
            channels,
            bytes_per_sample,
            sample_rate,
        };
        format.validate()?;
        Ok(format)
    }

    /// Creates a 16-bit mono format.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            bytes_per_sample: 2,
            sample_rate,
        }
    }

    /// Creates a 16-bit stereo format.
    pub fn stereo(sample_rate: u32) -> Self {
        Self {
            channels: 2,
            bytes_per_sample: 2,
            sample_rate,
        }
    }

    /// Checks the parameter constraints.
    pub fn validate(&self) -> WavResult<()> {
        if !matches!(self.channels, 1 | 2) {
            return Err(WavError::invalid_param(
                "channels",
                format!("must be 1 or 2, got {}", self.channels),
            ));
        }
        if !matches!(self.bytes_per_sample, 1 | 2) {
            return Err(WavError::invalid_param(
                "bytes_per_sample",
                format!("must be 1 or 2, got {}", self.bytes_per_sample),
            ));
        }
        if self.sample_rate == 0 {
            return Err(WavError::invalid_param(
                "sample_rate",
                "must be greater than zero",
            ));
        }
        if self.checked_byte_rate().is_none() {
            return Err(WavError::invalid_param(
                "sample_rate",
                format!(
                    "{} Hz overflows the 32-bit byte rate field",
                    self.sample_rate
                ),
            ));
        }
        Ok(())
    }

    /// Bits per sample as stored in the header.
    pub fn bits_per_sample(&self) -> u16 {
        self.bytes_per_sample * 8
    }

    /// Bytes per sample frame.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample
    }

    /// Bytes per second.
    ///
    /// Saturates at `u32::MAX` for formats that fail [`validate`](Self::validate).
    pub fn byte_rate(&self) -> u32 {
        self.checked_byte_rate().unwrap_or(u32::MAX)
    }

    fn checked_byte_rate(&self) -> Option<u32> {
        self.sample_rate.checked_mul(u32::from(self.block_align()))
    }

    /// Integer value a normalized amplitude of `1.0` is scaled to.
    ///
    /// `1 << (bits - HEADROOM_BITS)`: 64 for 8-bit, 16384 for 16-bit.
    pub fn max_amplitude(&self) -> f64 {
        (1u32 << (self.bits_per_sample() as u32 - HEADROOM_BITS)) as f64
    }
}
