//! Error types for overscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverscribeError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Window encoding errors
    #[error("Failed to encode window: {message}")]
    WindowEncode { message: String },

    // Transcription errors
    #[error("Transcription request failed: {message}")]
    Transcription { message: String },

    #[error("Malformed transcription response: {message}")]
    MalformedResponse { message: String },

    // Token prediction errors
    #[error("Token prediction failed: {message}")]
    Prediction { message: String },

    // Signal handling
    #[error("Received interrupt signal")]
    Interrupted,

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, OverscribeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_parse_display() {
        let error = OverscribeError::ConfigParse {
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: invalid TOML syntax"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = OverscribeError::ConfigInvalidValue {
            key: "windowing.step_ms".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for windowing.step_ms: must be positive"
        );
    }

    #[test]
    fn test_audio_device_not_found_display() {
        let error = OverscribeError::AudioDeviceNotFound {
            device: "default".to_string(),
        };
        assert_eq!(error.to_string(), "Audio device not found: default");
    }

    #[test]
    fn test_audio_capture_display() {
        let error = OverscribeError::AudioCapture {
            message: "buffer overflow".to_string(),
        };
        assert_eq!(error.to_string(), "Audio capture failed: buffer overflow");
    }

    #[test]
    fn test_window_encode_display() {
        let error = OverscribeError::WindowEncode {
            message: "disk full".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to encode window: disk full");
    }

    #[test]
    fn test_transcription_display() {
        let error = OverscribeError::Transcription {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription request failed: connection refused"
        );
    }

    #[test]
    fn test_malformed_response_display() {
        let error = OverscribeError::MalformedResponse {
            message: "expected key 'text'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed transcription response: expected key 'text'"
        );
    }

    #[test]
    fn test_prediction_display() {
        let error = OverscribeError::Prediction {
            message: "no continuation for prefix".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Token prediction failed: no continuation for prefix"
        );
    }

    #[test]
    fn test_interrupted_display() {
        let error = OverscribeError::Interrupted;
        assert_eq!(error.to_string(), "Received interrupt signal");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: OverscribeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: OverscribeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<OverscribeError>();
        assert_sync::<OverscribeError>();
    }
}
