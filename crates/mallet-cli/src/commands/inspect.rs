//! Inspect command implementation
//!
//! Reads a WAV file and reports its format, length and a hash of the PCM
//! payload.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use mallet_wav::{compute_pcm_hash, read_wav_from, WavSamples};

/// Metadata reported for one WAV file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub path: String,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
    pub frames: usize,
    pub duration_seconds: f64,
    /// Largest absolute sample value, for 16-bit files only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<i32>,
    /// BLAKE3 hash of the data payload.
    pub pcm_hash: String,
}

/// Run the inspect command
///
/// # Arguments
/// * `path` - Path to the WAV file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(path: &str, json_output: bool) -> Result<ExitCode> {
    let report = inspect_file(Path::new(path))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Inspecting".cyan().bold(), report.path);
    println!("  {} {}", "Channels:".dimmed(), report.channels);
    println!("  {} {}", "Bits:".dimmed(), report.bits_per_sample);
    println!("  {} {} Hz", "Sample rate:".dimmed(), report.sample_rate);
    println!(
        "  {} {} ({:.3}s)",
        "Frames:".dimmed(),
        report.frames,
        report.duration_seconds
    );
    if let Some(peak) = report.peak {
        println!("  {} {}", "Peak:".dimmed(), peak);
    }
    println!("  {} {}", "PCM hash:".dimmed(), &report.pcm_hash[..16]);

    Ok(ExitCode::SUCCESS)
}

/// Reads `path` and builds its report.
pub fn inspect_file(path: &Path) -> Result<InspectReport> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let data = read_wav_from(bytes.as_slice())
        .with_context(|| format!("Invalid WAV file: {}", path.display()))?;
    let pcm_hash = compute_pcm_hash(&bytes)
        .with_context(|| format!("No PCM data in: {}", path.display()))?;

    let peak = if data.format.bytes_per_sample == 2 {
        Some(peak_value(&data.samples))
    } else {
        None
    };

    Ok(InspectReport {
        path: path.display().to_string(),
        channels: data.format.channels,
        bits_per_sample: data.format.bits_per_sample(),
        sample_rate: data.format.sample_rate,
        frames: data.num_frames(),
        duration_seconds: data.duration_seconds(),
        peak,
        pcm_hash,
    })
}

fn peak_value(samples: &WavSamples) -> i32 {
    match samples {
        WavSamples::Mono(values) => values.iter().map(|v| v.abs()).max(),
        WavSamples::Stereo(frames) => frames.iter().map(|(l, r)| l.abs().max(r.abs())).max(),
    }
    .unwrap_or(0)
}
