//! mallet WAV container codec
//!
//! This crate reads and writes the canonical 44-byte-header RIFF/WAVE layout
//! used by the mallet renderer: uncompressed linear PCM, mono or stereo,
//! 8-bit or 16-bit samples, any positive sample rate.
//!
//! # Writing
//!
//! [`WavWriter`] is a streaming writer. The header is written when the writer
//! is created with placeholder size fields, samples are appended as they are
//! produced, and [`WavWriter::finalize`] patches both size fields. A writer that
//! is dropped without being finalized leaves a file with zeroed size fields.
//!
//! Input samples are normalized floats. They are scaled by
//! [`WavFormat::max_amplitude`], which keeps [`HEADROOM_BITS`] bits of headroom
//! below the full integer range so additive mixes can overshoot `1.0` without
//! wrapping.
//!
//! # Reading
//!
//! [`read_wav`] returns the raw integer PCM values, **not** normalized floats.
//! The reader does not undo the writer's scaling; divide by
//! [`WavFormat::max_amplitude`] to get back to the writer's input range. 8-bit
//! payloads are returned as unsigned bytes (`0..=255`), 16-bit payloads as signed
//! values.
//!
//! # Example
//!
//! ```no_run
//! use mallet_wav::{read_wav, WavFormat, WavSamples, WavWriter};
//!
//! let format = WavFormat::new(1, 2, 44100)?;
//! let mut writer = WavWriter::create("tone.wav", format)?;
//! writer.write_samples(&[0.0, 0.5, -0.5])?;
//! writer.finalize()?;
//!
//! let data = read_wav("tone.wav")?;
//! assert_eq!(data.samples, WavSamples::Mono(vec![0, 8192, -8192]));
//! # Ok::<(), mallet_wav::WavError>(())
//! ```

pub mod error;
pub mod format;
pub mod pcm;
pub mod reader;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main types at crate root
pub use error::{WavError, WavResult};
pub use format::{
    WavFormat, FORMAT_CHUNK_SIZE, HEADER_SIZE, HEADROOM_BITS, PCM_FORMAT, TAG_DATA, TAG_FMT,
    TAG_RIFF, TAG_WAVE,
};
pub use pcm::{compute_pcm_hash, encode_sample, extract_pcm_data, sign_extend_16};
pub use reader::{read_wav, read_wav_from, WavData, WavSamples};
pub use writer::WavWriter;
