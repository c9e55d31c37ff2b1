use crate::defaults;
use crate::error::{OverscribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub windowing: WindowingConfig,
    pub transcriber: TranscriberConfig,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
}

/// Sliding-window configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowingConfig {
    /// Duration of each window in milliseconds.
    pub window_ms: u32,
    /// Hop between consecutive windows in milliseconds.
    pub step_ms: u32,
    /// Number of recent windows retained for prediction.
    pub depth: usize,
    /// N-gram order used for token prediction.
    pub lookback: usize,
}

/// Remote transcriber configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Whisper server inference endpoint.
    pub url: String,
    /// Per-request timeout in milliseconds; 0 disables the timeout.
    /// A timed-out request drops that window's transcript.
    pub timeout_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            window_ms: defaults::WINDOW_DURATION_MS,
            step_ms: defaults::WINDOW_STEP_MS,
            depth: defaults::WINDOW_DEPTH,
            lookback: defaults::TOKEN_LOOKBACK,
        }
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            url: defaults::WHISPER_URL.to_string(),
            timeout_ms: defaults::TRANSCRIBER_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - OVERSCRIBE_URL → transcriber.url
    /// - OVERSCRIBE_AUDIO_DEVICE → audio.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("OVERSCRIBE_URL")
            && !url.is_empty()
        {
            self.transcriber.url = url;
        }

        if let Ok(device) = std::env::var("OVERSCRIBE_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        self
    }

    /// Validate parameter ranges before the pipeline is built.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(OverscribeError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.windowing.window_ms == 0 {
            return Err(OverscribeError::ConfigInvalidValue {
                key: "windowing.window_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.windowing.step_ms == 0 {
            return Err(OverscribeError::ConfigInvalidValue {
                key: "windowing.step_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.windowing.depth == 0 {
            return Err(OverscribeError::ConfigInvalidValue {
                key: "windowing.depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.windowing.lookback == 0 {
            return Err(OverscribeError::ConfigInvalidValue {
                key: "windowing.lookback".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.transcriber.url.is_empty() {
            return Err(OverscribeError::ConfigInvalidValue {
                key: "transcriber.url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Number of samples per window at the configured sample rate.
    pub fn window_samples(&self) -> usize {
        (self.audio.sample_rate as u64 * self.windowing.window_ms as u64 / 1000) as usize
    }

    /// Number of samples per hop at the configured sample rate.
    pub fn step_samples(&self) -> usize {
        (self.audio.sample_rate as u64 * self.windowing.step_ms as u64 / 1000) as usize
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/overscribe/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("overscribe")
            .join("config.toml")
    }
}
