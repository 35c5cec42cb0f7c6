//! mallet CLI - renders note scores to WAV files
//!
//! This binary parses a score, synthesizes it with one of the stock
//! instruments and writes PCM WAV output. It can also inspect existing WAV
//! files.

use clap::{ArgAction, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;

use mallet_cli::commands;
use mallet_cli::commands::render::RenderOverrides;
use mallet_synth::InstrumentKind;

/// mallet - Note Score Synthesizer
#[derive(Parser)]
#[command(name = "mallet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score file to a WAV file
    Render {
        /// Path to the score file
        score: String,

        /// Path of the WAV file to write
        output: String,

        /// Skip the half-second lead-in
        #[arg(long)]
        preview: bool,

        /// Instrument to render with (marimba, mystery)
        #[arg(long)]
        instrument: Option<InstrumentKind>,

        /// Output sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Output channels
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=2))]
        channels: Option<u16>,

        /// Bytes per sample
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=2))]
        bytes_per_sample: Option<u16>,

        /// JSON file with render options (flags override it)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show format details of a WAV file
    Inspect {
        /// Path to the WAV file
        input: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            score,
            output,
            preview,
            instrument,
            sample_rate,
            channels,
            bytes_per_sample,
            config,
            json,
        } => {
            let overrides = RenderOverrides {
                preview,
                instrument,
                sample_rate,
                channels,
                bytes_per_sample,
            };
            commands::render::run(&score, &output, config.as_deref(), &overrides, json)
        }
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
