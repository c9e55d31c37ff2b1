//! Transcriber station.
//!
//! Sends each encoded window to the transcriber serially, preserving window
//! order end to end. A dropped window (per-request deadline) is skipped
//! silently; any other failure is fatal to the pipeline.

use crate::error::Result;
use crate::stt::transcriber::Transcriber;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Station that turns window files into transcript strings.
pub struct TranscriberStation<T: Transcriber> {
    transcriber: Arc<T>,
}

impl<T: Transcriber + 'static> TranscriberStation<T> {
    /// Creates a new transcriber station wrapping the given transcriber.
    pub fn new(transcriber: T) -> Self {
        Self {
            transcriber: Arc::new(transcriber),
        }
    }

    /// Runs the station: transcribes windows one at a time until the input
    /// closes.
    pub async fn run(
        self,
        mut input: mpsc::Receiver<PathBuf>,
        output: mpsc::Sender<String>,
    ) -> Result<()> {
        while let Some(path) = input.recv().await {
            match self.transcriber.transcribe(&path).await? {
                Some(text) => {
                    if output.send(text).await.is_err() {
                        return Ok(());
                    }
                }
                // Deadline exceeded: this window's transcript is dropped.
                None => continue,
            }
        }

        Ok(())
    }
}
