//! PCM sample conversion and payload hashing.

use crate::format::{WavFormat, HEADER_SIZE, TAG_RIFF, TAG_WAVE};

/// Scales a normalized sample to the integer value stored for `format`.
///
/// The result is `round(value * max_amplitude)`, saturated to the signed range
/// of the sample width. Saturation only kicks in once a mix exceeds the
/// headroom (4.0 for the default two headroom bits).
pub fn encode_sample(value: f64, format: &WavFormat) -> i32 {
    let scaled = (value * format.max_amplitude()).round();
    match format.bytes_per_sample {
        1 => scaled.clamp(i8::MIN as f64, i8::MAX as f64) as i32,
        _ => scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i32,
    }
}

/// Sign-extends a raw little-endian 16-bit value.
///
/// Patterns above `0x8000` get the high bits filled, so `0x8001` becomes
/// `-32767` and `0xFFFF` becomes `-1`. `0x8000` itself is left positive and
/// decodes to `32768`.
pub fn sign_extend_16(raw: u16) -> i32 {
    const FILL: i32 = -1 << 16;
    let value = raw as i32;
    if value > 0x8000 {
        FILL | value
    } else {
        value
    }
}

/// Extracts the PCM payload from a complete WAV file buffer.
///
/// The payload is everything after the fixed 44-byte header.
///
/// # Returns
/// PCM data if the buffer starts with a RIFF/WAVE header, or None otherwise
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    let header = HEADER_SIZE as usize;
    if wav_data.len() < header {
        return None;
    }

    if wav_data[0..4] != TAG_RIFF || wav_data[8..12] != TAG_WAVE {
        return None;
    }

    Some(&wav_data[header..])
}

/// Computes the BLAKE3 hash of a WAV file's PCM payload.
///
/// Two files with the same samples hash the same regardless of header
/// differences.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}
