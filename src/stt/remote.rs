//! Remote Whisper-compatible transcription over HTTP.
//!
//! Each encoded window is POSTed as a `multipart/form-data` upload with a
//! single `file` part. The server answers with a JSON object carrying a
//! string `text` field; anything else is a fatal error. When a per-request
//! timeout is configured, a request that exceeds it drops that window's
//! transcript instead of failing the pipeline.

use crate::error::{OverscribeError, Result};
use crate::stt::transcriber::Transcriber;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcriber backed by a Whisper-compatible HTTP inference server.
pub struct RemoteWhisper {
    client: reqwest::Client,
    endpoint: String,
    /// Zero disables the per-request deadline.
    timeout: Duration,
}

impl RemoteWhisper {
    /// Creates a client for the given inference endpoint.
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    /// The configured inference endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transcriber for RemoteWhisper {
    async fn transcribe(&self, path: &Path) -> Result<Option<String>> {
        let wav_bytes = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "window.wav".to_string());

        let file_part = Part::bytes(wav_bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| OverscribeError::Transcription {
                message: format!("Failed to build multipart audio part: {}", e),
            })?;

        let form = Form::new().part("file", file_part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if !self.timeout.is_zero() {
            request = request.timeout(self.timeout);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Ok(None),
            Err(e) => {
                return Err(OverscribeError::Transcription {
                    message: format!("Request to {} failed: {}", self.endpoint, e),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OverscribeError::Transcription {
                message: format!("Server returned {}: {}", status, body),
            });
        }

        let body: WhisperResponse =
            response
                .json()
                .await
                .map_err(|e| OverscribeError::MalformedResponse {
                    message: format!("expected JSON object with string 'text': {}", e),
                })?;

        Ok(Some(body.text))
    }
}
