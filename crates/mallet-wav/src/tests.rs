//! Tests for the WAV codec.

use std::io::{self, Cursor, ErrorKind, Seek, SeekFrom, Write};

use pretty_assertions::assert_eq;

use super::*;

fn le_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn write_to_vec(format: WavFormat, samples: &[f64]) -> Vec<u8> {
    let mut writer = WavWriter::new(Cursor::new(Vec::new()), format).unwrap();
    writer.write_samples(samples).unwrap();
    writer.finalize().unwrap().into_inner()
}

/// Hand-built header so reader tests do not depend on the writer.
fn raw_header(channels: u16, bits: u16, fmt_size: u32, audio_format: u16) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut header = Vec::with_capacity(44);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&36u32.to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&fmt_size.to_le_bytes());
    header.extend_from_slice(&audio_format.to_le_bytes());
    header.extend_from_slice(&channels.to_le_bytes());
    header.extend_from_slice(&8000u32.to_le_bytes());
    header.extend_from_slice(&(8000 * block_align as u32).to_le_bytes());
    header.extend_from_slice(&block_align.to_le_bytes());
    header.extend_from_slice(&bits.to_le_bytes());
    header.extend_from_slice(b"data");
    header.extend_from_slice(&0u32.to_le_bytes());
    header
}

// =========================================================================
// WavFormat tests
// =========================================================================

#[test]
fn test_format_valid_combinations() {
    for channels in [1, 2] {
        for bytes in [1, 2] {
            let format = WavFormat::new(channels, bytes, 22050).unwrap();
            assert_eq!(format.block_align(), channels * bytes);
            assert_eq!(format.byte_rate(), 22050 * (channels * bytes) as u32);
            assert_eq!(format.bits_per_sample(), bytes * 8);
        }
    }
}

#[test]
fn test_format_rejects_bad_parameters() {
    for (channels, bytes, rate, name) in [
        (0, 2, 44100, "channels"),
        (3, 2, 44100, "channels"),
        (1, 0, 44100, "bytes_per_sample"),
        (1, 3, 44100, "bytes_per_sample"),
        (1, 2, 0, "sample_rate"),
    ] {
        match WavFormat::new(channels, bytes, rate) {
            Err(WavError::InvalidParameter { name: found, .. }) => assert_eq!(found, name),
            other => panic!("expected InvalidParameter for {name}, got {other:?}"),
        }
    }
}

#[test]
fn test_max_amplitude_keeps_two_bits_of_headroom() {
    assert_eq!(WavFormat::new(1, 1, 8000).unwrap().max_amplitude(), 64.0);
    assert_eq!(WavFormat::mono(8000).max_amplitude(), 16384.0);
}

// =========================================================================
// Writer tests
// =========================================================================

#[test]
fn test_empty_file_header_fields() {
    let bytes = write_to_vec(WavFormat::new(1, 2, 44100).unwrap(), &[]);

    assert_eq!(bytes.len(), 44);
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(le_u32(&bytes, 4), 36);
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(&bytes[12..16], b"fmt ");
    assert_eq!(le_u32(&bytes, 16), 16);
    assert_eq!(le_u16(&bytes, 20), 1);
    assert_eq!(le_u16(&bytes, 22), 1);
    assert_eq!(le_u32(&bytes, 24), 44100);
    assert_eq!(le_u32(&bytes, 28), 88200);
    assert_eq!(le_u16(&bytes, 32), 2);
    assert_eq!(le_u16(&bytes, 34), 16);
    assert_eq!(&bytes[36..40], b"data");
    assert_eq!(le_u32(&bytes, 40), 0);
}

#[test]
fn test_stereo_8bit_header_fields() {
    let bytes = write_to_vec(WavFormat::new(2, 1, 11025).unwrap(), &[]);

    assert_eq!(le_u16(&bytes, 22), 2);
    assert_eq!(le_u32(&bytes, 28), 22050);
    assert_eq!(le_u16(&bytes, 32), 2);
    assert_eq!(le_u16(&bytes, 34), 8);
}

#[test]
fn test_size_fields_patched_after_writes() {
    let mut writer = WavWriter::new(Cursor::new(Vec::new()), WavFormat::mono(8000)).unwrap();
    writer.write_samples(&[0.1, 0.2]).unwrap();
    writer.write_samples(&[0.3]).unwrap();
    assert_eq!(writer.bytes_written(), 50);
    assert_eq!(writer.samples_written(), 3);

    let bytes = writer.finalize().unwrap().into_inner();
    assert_eq!(bytes.len(), 50);
    assert_eq!(le_u32(&bytes, 4), 42);
    assert_eq!(le_u32(&bytes, 40), 6);
}

#[test]
fn test_16bit_scaling_and_rounding() {
    let bytes = write_to_vec(WavFormat::mono(8000), &[0.0, 0.5, -0.5, 1.0, -1.0, 0.00004]);
    let pcm: Vec<i16> = bytes[44..]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    assert_eq!(pcm, vec![0, 8192, -8192, 16384, -16384, 1]);
}

#[test]
fn test_8bit_writes_one_signed_byte_per_sample() {
    let format = WavFormat::new(1, 1, 8000).unwrap();
    let bytes = write_to_vec(format, &[1.0, -1.0, 0.5]);

    assert_eq!(bytes.len(), 47);
    assert_eq!(&bytes[44..], &[64u8, 0xC0, 32]);
    assert_eq!(le_u32(&bytes, 40), 3);
}

#[test]
fn test_overshoot_saturates_instead_of_wrapping() {
    let bytes = write_to_vec(WavFormat::mono(8000), &[4.0, -4.0]);
    assert_eq!(i16::from_le_bytes([bytes[44], bytes[45]]), i16::MAX);
    assert_eq!(i16::from_le_bytes([bytes[46], bytes[47]]), i16::MIN);
}

#[test]
fn test_format_rejects_byte_rate_overflow() {
    let err = WavFormat::new(2, 2, 3_000_000_000).unwrap_err();
    match err {
        WavError::InvalidParameter { name, .. } => assert_eq!(name, "sample_rate"),
        other => panic!("expected invalid sample_rate, got {:?}", other),
    }

    // Largest rate whose byte rate still fits the header field.
    let format = WavFormat::new(2, 2, u32::MAX / 4).unwrap();
    assert_eq!(format.byte_rate(), u32::MAX / 4 * 4);
}

#[test]
fn test_writer_rejects_byte_rate_overflow() {
    let format = WavFormat {
        channels: 2,
        bytes_per_sample: 2,
        sample_rate: 3_000_000_000,
    };
    let result = WavWriter::new(Cursor::new(Vec::new()), format);
    assert!(matches!(result, Err(WavError::InvalidParameter { .. })));
}

/// Stream that accepts `remaining` more bytes, then fails every write.
struct FailingStream {
    inner: Cursor<Vec<u8>>,
    remaining: usize,
}

impl Write for FailingStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::other("disk full"));
        }
        let n = buf.len().min(self.remaining);
        self.remaining -= n;
        self.inner.write(&buf[..n])
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FailingStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn test_short_write_is_io_error() {
    let stream = FailingStream {
        inner: Cursor::new(Vec::new()),
        remaining: 44 + 4,
    };
    let mut writer = WavWriter::new(stream, WavFormat::mono(8000)).unwrap();
    writer.write_samples(&[0.1, 0.2]).unwrap();
    assert_eq!(writer.bytes_written(), 48);

    // Two of the four samples fit before the stream fails.
    let err = writer.write_samples(&[0.1, 0.2, 0.3, 0.4]).unwrap_err();
    match err {
        WavError::Io(e) => assert_eq!(e.kind(), ErrorKind::Other),
        other => panic!("expected io error, got {:?}", other),
    }
    assert_eq!(writer.bytes_written(), 48);
    assert_eq!(writer.samples_written(), 2);
}

#[test]
fn test_header_write_failure_is_io_error() {
    let stream = FailingStream {
        inner: Cursor::new(Vec::new()),
        remaining: 20,
    };
    let result = WavWriter::new(stream, WavFormat::mono(8000));
    assert!(matches!(result, Err(WavError::Io(_))));
}

#[test]
fn test_writer_rejects_invalid_format() {
    let format = WavFormat {
        channels: 3,
        bytes_per_sample: 2,
        sample_rate: 44100,
    };
    let result = WavWriter::new(Cursor::new(Vec::new()), format);
    assert!(matches!(result, Err(WavError::InvalidParameter { .. })));
}

#[test]
fn test_create_does_not_touch_disk_on_invalid_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.wav");
    let format = WavFormat {
        channels: 1,
        bytes_per_sample: 4,
        sample_rate: 44100,
    };

    assert!(WavWriter::create(&path, format).is_err());
    assert!(!path.exists());
}

// =========================================================================
// Reader tests
// =========================================================================

#[test]
fn test_sign_extension_of_16bit_values() {
    assert_eq!(sign_extend_16(0x8001), -32767);
    assert_eq!(sign_extend_16(0x8000), 32768);
    assert_eq!(sign_extend_16(0xFFFF), -1);
    assert_eq!(sign_extend_16(0x7FFF), 32767);
    assert_eq!(sign_extend_16(0), 0);
}

#[test]
fn test_read_leaves_0x8000_positive() {
    let mut bytes = raw_header(1, 16, 16, 1);
    bytes.extend_from_slice(&[0x00, 0x80, 0xFF, 0xFF]);

    let data = read_wav_from(bytes.as_slice()).unwrap();
    assert_eq!(data.samples, WavSamples::Mono(vec![32768, -1]));
}

#[test]
fn test_read_decodes_0x8001_as_negative() {
    let mut bytes = raw_header(1, 16, 16, 1);
    bytes.extend_from_slice(&[0x01, 0x80]);

    let data = read_wav_from(bytes.as_slice()).unwrap();
    assert_eq!(data.samples, WavSamples::Mono(vec![-32767]));
}

#[test]
fn test_read_8bit_values_are_unsigned() {
    let mut bytes = raw_header(1, 8, 16, 1);
    bytes.extend_from_slice(&[0, 128, 0xC0, 255]);

    let data = read_wav_from(bytes.as_slice()).unwrap();
    assert_eq!(data.format.bytes_per_sample, 1);
    assert_eq!(data.samples, WavSamples::Mono(vec![0, 128, 192, 255]));
}

#[test]
fn test_read_stereo_groups_frames_in_file_order() {
    let mut bytes = raw_header(2, 16, 16, 1);
    for value in [1i16, -1, 2, -2] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    let data = read_wav_from(bytes.as_slice()).unwrap();
    assert_eq!(data.samples, WavSamples::Stereo(vec![(1, -1), (2, -2)]));
    assert_eq!(data.num_frames(), 2);
}

#[test]
fn test_read_drops_trailing_partial_frame() {
    let mut bytes = raw_header(2, 8, 16, 1);
    bytes.extend_from_slice(&[10, 20, 30]);

    let data = read_wav_from(bytes.as_slice()).unwrap();
    assert_eq!(data.samples, WavSamples::Stereo(vec![(10, 20)]));
}

#[test]
fn test_read_rejects_bad_riff_tag() {
    let mut bytes = raw_header(1, 16, 16, 1);
    bytes[0..4].copy_from_slice(b"RIFX");

    let err = read_wav_from(bytes.as_slice()).unwrap_err();
    assert!(err.is_format_error());
    assert!(matches!(err, WavError::BadChunkId { chunk: "RIFF", .. }));
}

#[test]
fn test_read_rejects_bad_wave_and_data_tags() {
    let mut bytes = raw_header(1, 16, 16, 1);
    bytes[8..12].copy_from_slice(b"AVI ");
    let err = read_wav_from(bytes.as_slice()).unwrap_err();
    assert!(matches!(err, WavError::BadChunkId { chunk: "WAVE", .. }));

    let mut bytes = raw_header(1, 16, 16, 1);
    bytes[36..40].copy_from_slice(b"LIST");
    let err = read_wav_from(bytes.as_slice()).unwrap_err();
    assert!(matches!(err, WavError::BadChunkId { chunk: "data", .. }));
}

#[test]
fn test_read_rejects_extended_fmt_chunk() {
    let bytes = raw_header(1, 16, 18, 1);
    let err = read_wav_from(bytes.as_slice()).unwrap_err();
    assert!(matches!(err, WavError::UnsupportedFormatChunkSize(18)));
}

#[test]
fn test_read_rejects_non_pcm_format() {
    let bytes = raw_header(1, 16, 16, 3);
    let err = read_wav_from(bytes.as_slice()).unwrap_err();
    assert!(matches!(err, WavError::UnsupportedAudioFormat(3)));
}

#[test]
fn test_read_rejects_unsupported_layouts() {
    let err = read_wav_from(raw_header(6, 16, 16, 1).as_slice()).unwrap_err();
    assert!(matches!(err, WavError::UnsupportedChannels(6)));

    let err = read_wav_from(raw_header(1, 24, 16, 1).as_slice()).unwrap_err();
    assert!(matches!(err, WavError::UnsupportedBitDepth(24)));
}

#[test]
fn test_read_short_header_is_io_error() {
    let bytes = raw_header(1, 16, 16, 1);
    match read_wav_from(&bytes[..30]) {
        Err(WavError::Io(err)) => assert_eq!(err.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_wav(dir.path().join("missing.wav")).unwrap_err();
    assert!(matches!(err, WavError::Io(_)));
}

// =========================================================================
// PCM hash tests
// =========================================================================

#[test]
fn test_pcm_hash_ignores_header_differences() {
    let a = write_to_vec(WavFormat::mono(8000), &[0.1, 0.2, 0.3]);
    let b = write_to_vec(WavFormat::mono(48000), &[0.1, 0.2, 0.3]);
    let c = write_to_vec(WavFormat::mono(8000), &[0.1, 0.2, 0.4]);

    assert_eq!(compute_pcm_hash(&a), compute_pcm_hash(&b));
    assert_ne!(compute_pcm_hash(&a), compute_pcm_hash(&c));
}

#[test]
fn test_extract_pcm_data_rejects_non_wav() {
    assert!(extract_pcm_data(b"not a wav").is_none());
    assert!(extract_pcm_data(&[0u8; 64]).is_none());
}
