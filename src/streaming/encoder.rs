//! Window encoder station.
//!
//! Writes each audio window to a WAV file in a session-scoped temporary
//! directory and forwards the path downstream. The directory is removed when
//! the station is dropped at pipeline shutdown.

use crate::audio::wav::encode_wav;
use crate::error::Result;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Encodes windows to WAV files in a temporary directory.
pub struct EncoderStation {
    dir: TempDir,
    sample_rate: u32,
    next_index: u64,
}

impl EncoderStation {
    /// Creates an encoder with a fresh temporary directory.
    pub fn new(sample_rate: u32) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("overscribe-audio-")
            .tempdir()?;

        Ok(Self {
            dir,
            sample_rate,
            next_index: 0,
        })
    }

    /// Path of the session temp directory (for diagnostics).
    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Encodes one window and writes it to a uniquely-named file.
    async fn encode_window(&mut self, window: &[f32]) -> Result<PathBuf> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = self
            .dir
            .path()
            .join(format!("{}_{:06}.wav", millis, self.next_index));
        self.next_index += 1;

        let bytes = encode_wav(window, self.sample_rate)?;
        tokio::fs::write(&path, bytes).await?;

        Ok(path)
    }

    /// Runs the station: encodes windows until the input closes.
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<Vec<f32>>,
        output: mpsc::Sender<PathBuf>,
    ) -> Result<()> {
        while let Some(window) = input.recv().await {
            let path = self.encode_window(&window).await?;
            if output.send(path).await.is_err() {
                return Ok(());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encode_window_writes_wav() {
        let mut encoder = EncoderStation::new(16000).unwrap();
        let window = vec![0.1f32; 800];

        let path = encoder.encode_window(&window).await.unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "wav");

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    #[tokio::test]
    async fn test_file_names_are_unique() {
        let mut encoder = EncoderStation::new(16000).unwrap();
        let window = vec![0.0f32; 16];

        let a = encoder.encode_window(&window).await.unwrap();
        let b = encoder.encode_window(&window).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_temp_dir_removed_on_drop() {
        let encoder = EncoderStation::new(16000).unwrap();
        let dir = encoder.dir().to_path_buf();
        assert!(dir.exists());

        drop(encoder);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_run_station() {
        let encoder = EncoderStation::new(16000).unwrap();
        let (input_tx, input_rx) = mpsc::channel(4);
        let (output_tx, mut output_rx) = mpsc::channel(4);

        let task = tokio::spawn(async move { encoder.run(input_rx, output_tx).await });

        input_tx.send(vec![0.2f32; 160]).await.unwrap();
        input_tx.send(vec![0.3f32; 160]).await.unwrap();
        drop(input_tx);

        let first = output_rx.recv().await.unwrap();
        let second = output_rx.recv().await.unwrap();
        assert!(output_rx.recv().await.is_none());
        assert_ne!(first, second);

        assert!(task.await.unwrap().is_ok());
    }
}
