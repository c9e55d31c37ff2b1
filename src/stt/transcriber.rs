use crate::error::{OverscribeError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Trait for speech-to-text transcription of encoded windows.
///
/// This trait allows swapping implementations (real Whisper server vs mock).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the WAV file at `path`.
    ///
    /// Returns `Ok(None)` when the request exceeded its deadline; that
    /// window's transcript is dropped and the pipeline continues. Transport
    /// failures and malformed responses are errors.
    async fn transcribe(&self, path: &Path) -> Result<Option<String>>;
}

/// Mock transcriber for testing.
///
/// Yields scripted responses in order; once the script runs out it returns
/// the fallback response (empty by default, which the emitter discards).
pub struct MockTranscriber {
    script: Mutex<VecDeque<ScriptEntry>>,
    fallback: String,
}

enum ScriptEntry {
    Text(String),
    Dropped,
    Failure(String),
}

impl MockTranscriber {
    /// Create a new mock transcriber with an empty script
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: String::new(),
        }
    }

    /// Append a scripted transcript response
    pub fn with_response(self, text: &str) -> Self {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(ScriptEntry::Text(text.to_string()));
        self
    }

    /// Append a scripted per-request timeout (dropped window)
    pub fn with_drop(self) -> Self {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(ScriptEntry::Dropped);
        self
    }

    /// Append a scripted transport failure
    pub fn with_failure(self, message: &str) -> Self {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(ScriptEntry::Failure(message.to_string()));
        self
    }

    /// Set the response returned once the script is exhausted
    pub fn with_fallback(mut self, text: &str) -> Self {
        self.fallback = text.to_string();
        self
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _path: &Path) -> Result<Option<String>> {
        let entry = self
            .script
            .lock()
            .expect("mock script lock poisoned")
            .pop_front();

        match entry {
            Some(ScriptEntry::Text(text)) => Ok(Some(text)),
            Some(ScriptEntry::Dropped) => Ok(None),
            Some(ScriptEntry::Failure(message)) => {
                Err(OverscribeError::Transcription { message })
            }
            None => Ok(Some(self.fallback.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_mock_plays_script_in_order() {
        let mock = MockTranscriber::new()
            .with_response("first")
            .with_drop()
            .with_response("second");
        let path = PathBuf::from("ignored.wav");

        assert_eq!(
            mock.transcribe(&path).await.unwrap(),
            Some("first".to_string())
        );
        assert_eq!(mock.transcribe(&path).await.unwrap(), None);
        assert_eq!(
            mock.transcribe(&path).await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_mock_falls_back_when_exhausted() {
        let mock = MockTranscriber::new().with_fallback("quiet room");
        let path = PathBuf::from("ignored.wav");

        assert_eq!(
            mock.transcribe(&path).await.unwrap(),
            Some("quiet room".to_string())
        );
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let mock = MockTranscriber::new().with_failure("connection refused");
        let path = PathBuf::from("ignored.wav");

        let err = mock.transcribe(&path).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_transcriber_trait_is_object_safe() {
        let _boxed: Box<dyn Transcriber> = Box::new(MockTranscriber::new());
    }
}
