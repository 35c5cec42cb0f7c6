//! Render command implementation
//!
//! Parses a score file, renders it with the configured instrument and writes
//! the result as a WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

use mallet_score::parse_score;
use mallet_synth::{InstrumentKind, RenderMode, RenderOptions, RenderStats, Synthesizer};

/// Settings given on the command line, applied on top of the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOverrides {
    pub preview: bool,
    pub instrument: Option<InstrumentKind>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub bytes_per_sample: Option<u16>,
}

impl RenderOverrides {
    /// Returns `options` with every given override applied.
    pub fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if self.preview {
            options.mode = RenderMode::Preview;
        }
        if let Some(instrument) = self.instrument {
            options.instrument = instrument;
        }
        if let Some(sample_rate) = self.sample_rate {
            options.sample_rate = sample_rate;
        }
        if let Some(channels) = self.channels {
            options.channels = channels;
        }
        if let Some(bytes_per_sample) = self.bytes_per_sample {
            options.bytes_per_sample = bytes_per_sample;
        }
        options
    }
}

/// JSON report for `render --json`.
#[derive(Debug, Serialize)]
struct RenderOutput<'a> {
    success: bool,
    output: &'a str,
    options: RenderOptions,
    stats: RenderStats,
    duration_seconds: f64,
}

/// Loads render options from a JSON config file, or the defaults.
pub fn load_options(config: Option<&str>) -> Result<RenderOptions> {
    let Some(path) = config else {
        return Ok(RenderOptions::default());
    };

    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path))?;
    let options = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config: {}", path))?;
    debug!(config = path, "loaded render options");
    Ok(options)
}

/// Run the render command
///
/// # Arguments
/// * `score_path` - Path to the score file
/// * `output_path` - Path of the WAV file to write
/// * `config` - Optional JSON file with render options
/// * `overrides` - Command-line settings applied over the config
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(
    score_path: &str,
    output_path: &str,
    config: Option<&str>,
    overrides: &RenderOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let options = overrides.apply(load_options(config)?);
    let stats = render_file(Path::new(score_path), Path::new(output_path), options)?;
    let duration_seconds = stats.samples_written as f64 / f64::from(options.sample_rate);

    if json_output {
        let output = RenderOutput {
            success: true,
            output: output_path,
            options,
            stats,
            duration_seconds,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Rendered".green().bold(), output_path);
    println!("  {} {}", "Instrument:".dimmed(), options.instrument);
    println!(
        "  {} {} Hz, {} ch, {}-bit",
        "Format:".dimmed(),
        options.sample_rate,
        options.channels,
        options.bytes_per_sample * 8
    );
    println!("  {} {}", "Notes:".dimmed(), stats.notes);
    println!("  {} {}", "Waveforms:".dimmed(), stats.cache_entries);
    println!(
        "  {} {} ({:.2}s)",
        "Samples:".dimmed(),
        stats.samples_written,
        duration_seconds
    );

    Ok(ExitCode::SUCCESS)
}

/// Parses `score_path` and renders it into `output_path`.
pub fn render_file(
    score_path: &Path,
    output_path: &Path,
    options: RenderOptions,
) -> Result<RenderStats> {
    let text = fs::read_to_string(score_path)
        .with_context(|| format!("Failed to read score: {}", score_path.display()))?;
    let score = parse_score(&text)
        .with_context(|| format!("Failed to parse score: {}", score_path.display()))?;

    let synth = Synthesizer::new(options)?;
    synth
        .render_to_file(&score.notes, output_path)
        .with_context(|| format!("Failed to render: {}", output_path.display()))
}
