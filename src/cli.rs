//! Command-line interface for overscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Live running transcript from overlapping speech windows
#[derive(Parser, Debug)]
#[command(
    name = "overscribe",
    version,
    about = "Live running transcript from overlapping speech windows"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-window progress, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Whisper server inference URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Audio input device (e.g., hw:0)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Read a WAV stream from stdin instead of the microphone
    #[arg(long)]
    pub stdin: bool,

    /// Record for this long, then stop. Examples: 30s, 5m, 1h30m
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub record_for: Option<Duration>,

    /// Fixed duration of each transcription window
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub window_duration: Option<Duration>,

    /// Time between the starts of consecutive windows
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub window_step: Option<Duration>,

    /// Number of recent windows kept for prediction
    #[arg(long, short = 'd', value_name = "COUNT")]
    pub depth: Option<usize>,

    /// N-gram length used for token prediction
    #[arg(long, short = 'n', value_name = "COUNT")]
    pub lookback: Option<usize>,

    /// Per-request transcription timeout; exceeding it drops that window.
    /// 0 disables the timeout
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

/// Parse a duration string.
///
/// Supports any format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`30s`, `5m`, `500ms`), and compound (`1h30m`, `2m30s`).
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio input devices
    Devices,
}
