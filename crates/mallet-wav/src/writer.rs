//! Streaming WAV writer with size fields patched on finalize.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, warn};

use crate::error::{WavError, WavResult};
use crate::format::{
    WavFormat, DATA_SIZE_OFFSET, FORMAT_CHUNK_SIZE, HEADER_SIZE, PCM_FORMAT, RIFF_SIZE_OFFSET,
    TAG_DATA, TAG_FMT, TAG_RIFF, TAG_WAVE,
};
use crate::pcm::encode_sample;

/// Streaming WAV writer.
///
/// Creating the writer emits the 44-byte header with zeroed size fields.
/// [`write_samples`](Self::write_samples) appends encoded samples, and
/// [`finalize`](Self::finalize) seeks back to patch the RIFF and data sizes.
/// `finalize` consumes the writer, so nothing can be written after it.
///
/// Samples are written exactly as given. For stereo formats the caller
/// interleaves left and right.
#[derive(Debug)]
pub struct WavWriter<W: Write + Seek> {
    inner: Option<W>,
    format: WavFormat,
    bytes_written: u64,
}

impl WavWriter<BufWriter<File>> {
    /// Creates a file at `path` and writes the header.
    ///
    /// Parameters are validated before the file is created, so an invalid
    /// format leaves nothing on disk.
    pub fn create<P: AsRef<Path>>(path: P, format: WavFormat) -> WavResult<Self> {
        format.validate()?;
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "created WAV file");
        Self::new(BufWriter::new(file), format)
    }
}

impl<W: Write + Seek> WavWriter<W> {
    /// Wraps `inner` and writes the header at its current position.
    ///
    /// `inner` is expected to be positioned at the start of an empty stream.
    pub fn new(mut inner: W, format: WavFormat) -> WavResult<Self> {
        format.validate()?;
        write_header(&mut inner, &format)?;
        debug!(
            channels = format.channels,
            bytes_per_sample = format.bytes_per_sample,
            sample_rate = format.sample_rate,
            "opened WAV writer"
        );

        Ok(Self {
            inner: Some(inner),
            format,
            bytes_written: HEADER_SIZE,
        })
    }

    /// Returns the stream format.
    pub fn format(&self) -> &WavFormat {
        &self.format
    }

    /// Total bytes written so far, header included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of individual samples (not frames) written so far.
    pub fn samples_written(&self) -> u64 {
        (self.bytes_written - HEADER_SIZE) / self.format.bytes_per_sample as u64
    }

    /// Encodes and appends normalized samples.
    ///
    /// Each value is scaled by [`WavFormat::max_amplitude`], rounded and
    /// stored as a little-endian signed integer of the configured width.
    pub fn write_samples(&mut self, samples: &[f64]) -> WavResult<()> {
        let width = self.format.bytes_per_sample as usize;
        let len = (samples.len() * width) as u64;
        if self.bytes_written + len > u32::MAX as u64 {
            return Err(WavError::DataTooLarge {
                bytes: self.bytes_written + len,
            });
        }

        let mut buffer = Vec::with_capacity(samples.len() * width);
        for &sample in samples {
            let value = encode_sample(sample, &self.format);
            if width == 1 {
                buffer.write_i8(value as i8)?;
            } else {
                buffer.write_i16::<LittleEndian>(value as i16)?;
            }
        }

        self.inner_mut()?.write_all(&buffer)?;
        self.bytes_written += len;
        Ok(())
    }

    /// Patches the size fields, flushes, and returns the underlying stream.
    pub fn finalize(mut self) -> WavResult<W> {
        let riff_size = self.size_field(self.bytes_written - 8)?;
        let data_size = self.size_field(self.bytes_written - HEADER_SIZE)?;
        let bytes_written = self.bytes_written;

        let mut inner = match self.inner.take() {
            Some(inner) => inner,
            None => return Err(already_finalized().into()),
        };

        inner.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        inner.write_u32::<LittleEndian>(riff_size)?;
        inner.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
        inner.write_u32::<LittleEndian>(data_size)?;
        inner.seek(SeekFrom::End(0))?;
        inner.flush()?;

        debug!(bytes = bytes_written, "finalized WAV writer");
        Ok(inner)
    }

    fn size_field(&self, size: u64) -> WavResult<u32> {
        u32::try_from(size).map_err(|_| WavError::DataTooLarge {
            bytes: self.bytes_written,
        })
    }

    fn inner_mut(&mut self) -> io::Result<&mut W> {
        self.inner.as_mut().ok_or_else(already_finalized)
    }
}

impl<W: Write + Seek> Drop for WavWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            warn!(
                bytes = self.bytes_written,
                "WAV writer dropped without finalize; size fields were not patched"
            );
        }
    }
}

fn already_finalized() -> io::Error {
    io::Error::other("WAV writer already finalized")
}

/// Writes the 44-byte header with zeroed size fields.
fn write_header<W: Write>(writer: &mut W, format: &WavFormat) -> io::Result<()> {
    // RIFF header
    writer.write_all(&TAG_RIFF)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_all(&TAG_WAVE)?;

    // fmt chunk
    writer.write_all(&TAG_FMT)?;
    writer.write_u32::<LittleEndian>(FORMAT_CHUNK_SIZE)?;
    writer.write_u16::<LittleEndian>(PCM_FORMAT)?;
    writer.write_u16::<LittleEndian>(format.channels)?;
    writer.write_u32::<LittleEndian>(format.sample_rate)?;
    writer.write_u32::<LittleEndian>(format.byte_rate())?;
    writer.write_u16::<LittleEndian>(format.block_align())?;
    writer.write_u16::<LittleEndian>(format.bits_per_sample())?;

    // data chunk
    writer.write_all(&TAG_DATA)?;
    writer.write_u32::<LittleEndian>(0)?;

    Ok(())
}
