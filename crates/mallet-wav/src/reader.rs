//! WAV reader returning raw integer PCM values.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use crate::error::{WavError, WavResult};
use crate::format::{
    WavFormat, FORMAT_CHUNK_SIZE, HEADER_SIZE, PCM_FORMAT, TAG_DATA, TAG_FMT, TAG_RIFF, TAG_WAVE,
};
use crate::pcm::sign_extend_16;

/// Decoded sample payload.
///
/// Values are raw integers: `0..=255` for 8-bit files (no sign extension),
/// `-32767..=32768` for 16-bit files (the pattern `0x8000` reads as `32768`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WavSamples {
    /// One value per frame.
    Mono(Vec<i32>),
    /// `(left, right)` per frame, in file order.
    Stereo(Vec<(i32, i32)>),
}

impl WavSamples {
    /// Number of frames.
    pub fn len(&self) -> usize {
        match self {
            WavSamples::Mono(samples) => samples.len(),
            WavSamples::Stereo(frames) => frames.len(),
        }
    }

    /// Returns true if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavData {
    /// Stream parameters from the `fmt ` chunk.
    pub format: WavFormat,
    /// Raw integer samples.
    pub samples: WavSamples,
}

impl WavData {
    /// Number of sample frames.
    pub fn num_frames(&self) -> usize {
        self.samples.len()
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames() as f64 / self.format.sample_rate as f64
    }
}

/// Reads a WAV file from disk.
///
/// # Errors
/// - [`WavError::Io`] if the file cannot be opened or is shorter than the
///   44-byte header.
/// - A format error (see [`WavError::is_format_error`]) if a tag, the `fmt `
///   chunk size, the format code, the channel count or the bit depth is not
///   the supported PCM layout.
pub fn read_wav<P: AsRef<Path>>(path: P) -> WavResult<WavData> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "reading WAV file");
    read_wav_from(BufReader::new(file))
}

/// Reads a WAV stream.
///
/// The payload is everything after the 44-byte header; the data size field is
/// not trusted. A trailing partial sample or partial stereo frame is dropped.
pub fn read_wav_from<R: Read>(mut reader: R) -> WavResult<WavData> {
    let mut header = [0u8; HEADER_SIZE as usize];
    reader.read_exact(&mut header)?;
    let format = parse_header(&header)?;

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;

    let values = decode_values(&payload, format.bytes_per_sample);
    let samples = if format.channels == 1 {
        WavSamples::Mono(values)
    } else {
        WavSamples::Stereo(
            values
                .chunks_exact(2)
                .map(|frame| (frame[0], frame[1]))
                .collect(),
        )
    };

    debug!(
        frames = samples.len(),
        payload_bytes = payload.len(),
        "decoded WAV payload"
    );
    Ok(WavData { format, samples })
}

fn parse_header(header: &[u8]) -> WavResult<WavFormat> {
    let mut cursor = header;

    expect_tag(&mut cursor, "RIFF", TAG_RIFF)?;
    let _riff_size = cursor.read_u32::<LittleEndian>()?;
    expect_tag(&mut cursor, "WAVE", TAG_WAVE)?;

    expect_tag(&mut cursor, "fmt", TAG_FMT)?;
    let chunk_size = cursor.read_u32::<LittleEndian>()?;
    let audio_format = cursor.read_u16::<LittleEndian>()?;
    let channels = cursor.read_u16::<LittleEndian>()?;
    let sample_rate = cursor.read_u32::<LittleEndian>()?;
    let _byte_rate = cursor.read_u32::<LittleEndian>()?;
    let _block_align = cursor.read_u16::<LittleEndian>()?;
    let bits_per_sample = cursor.read_u16::<LittleEndian>()?;

    if chunk_size != FORMAT_CHUNK_SIZE {
        return Err(WavError::UnsupportedFormatChunkSize(chunk_size));
    }
    if audio_format != PCM_FORMAT {
        return Err(WavError::UnsupportedAudioFormat(audio_format));
    }
    if !matches!(channels, 1 | 2) {
        return Err(WavError::UnsupportedChannels(channels));
    }
    if !matches!(bits_per_sample, 8 | 16) {
        return Err(WavError::UnsupportedBitDepth(bits_per_sample));
    }

    expect_tag(&mut cursor, "data", TAG_DATA)?;
    let _data_size = cursor.read_u32::<LittleEndian>()?;

    Ok(WavFormat {
        channels,
        bytes_per_sample: bits_per_sample / 8,
        sample_rate,
    })
}

fn expect_tag(cursor: &mut &[u8], chunk: &'static str, expected: [u8; 4]) -> WavResult<()> {
    let mut found = [0u8; 4];
    cursor.read_exact(&mut found)?;
    if found != expected {
        return Err(WavError::BadChunkId {
            chunk,
            expected,
            found,
        });
    }
    Ok(())
}

fn decode_values(payload: &[u8], bytes_per_sample: u16) -> Vec<i32> {
    if bytes_per_sample == 1 {
        payload.iter().map(|&byte| byte as i32).collect()
    } else {
        payload
            .chunks_exact(2)
            .map(|pair| sign_extend_16(u16::from_le_bytes([pair[0], pair[1]])))
            .collect()
    }
}
