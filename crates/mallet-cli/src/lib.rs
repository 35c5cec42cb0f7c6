//! mallet CLI library.
//!
//! Command implementations behind the `mallet` binary: rendering scores to
//! WAV files and inspecting existing WAV files.

pub mod commands;
