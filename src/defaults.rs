//! Default configuration constants for overscribe.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency for voice applications.
pub const SAMPLE_RATE: u32 = 16000;

/// Default window duration in milliseconds.
///
/// Each transcription window covers this much audio. 4 seconds gives Whisper
/// enough context to produce usable partial transcripts.
pub const WINDOW_DURATION_MS: u32 = 4000;

/// Default window step (hop) in milliseconds.
///
/// A new window starts this often. With a 4s window and a 500ms step,
/// consecutive windows share 3.5s of audio.
pub const WINDOW_STEP_MS: u32 = 500;

/// Default number of recent windows retained for chain training and prediction.
pub const WINDOW_DEPTH: usize = 3;

/// Default n-gram order used for token prediction.
pub const TOKEN_LOOKBACK: usize = 3;

/// Default recording duration in seconds before capture stops on its own.
pub const RECORD_FOR_SECS: u64 = 30;

/// Default per-request transcription timeout in milliseconds. 0 disables the
/// timeout; when set, a request exceeding it drops that window's transcript.
pub const TRANSCRIBER_TIMEOUT_MS: u64 = 0;

/// Default Whisper server inference endpoint.
pub const WHISPER_URL: &str = "http://localhost:8080/inference";

/// Default capacity of the raw sample channel, in chunks.
///
/// Must accommodate at least one full window's worth of capture chunks so a
/// transient downstream stall does not lose audio. Capture chunks arrive at
/// roughly 100ms granularity, so one 4s window is ~40 chunks.
pub const SAMPLE_CHANNEL_CHUNKS: usize = 64;

/// Default capacity of the frame and transcript channels.
pub const FRAME_CHANNEL: usize = 1024;

/// Default capacity of the emitted token channel.
pub const TOKEN_CHANNEL: usize = 1024 * 16;
