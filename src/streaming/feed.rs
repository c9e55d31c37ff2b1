//! Sample feed for continuous audio capture.
//!
//! Pumps chunks from an [`AudioSource`] into the pipeline's bounded sample
//! channel from a dedicated blocking context, decoupled from windowing and
//! transcription timing.

use crate::audio::recorder::AudioSource;
use crate::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Pump that moves sample chunks from an audio source into a channel.
pub struct SampleFeed {
    source: Box<dyn AudioSource>,
    running: Arc<AtomicBool>,
}

impl SampleFeed {
    /// Creates a feed wrapping the given audio source.
    pub fn new(source: Box<dyn AudioSource>) -> Self {
        Self {
            source,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns a handle that can stop the feed from another task.
    pub fn handle(&self) -> FeedHandle {
        FeedHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Runs the capture loop until the source is exhausted, the handle stops
    /// it, or the receiver goes away. Blocking; call from a blocking context.
    ///
    /// The sample channel is closed when this returns, which is what signals
    /// end of input to the rest of the pipeline.
    pub fn run(mut self, tx: mpsc::Sender<Vec<f32>>) -> Result<()> {
        if let Err(e) = self.source.start() {
            self.running.store(false, Ordering::SeqCst);
            return Err(e);
        }

        let result = loop {
            if !self.running.load(Ordering::SeqCst) {
                break Ok(());
            }

            match self.source.read_samples() {
                Ok(samples) if samples.is_empty() => break Ok(()),
                Ok(samples) => {
                    if tx.blocking_send(samples).is_err() {
                        break Ok(());
                    }
                }
                Err(e) => break Err(e),
            }
        };

        self.running.store(false, Ordering::SeqCst);
        let _ = self.source.stop();
        result
    }
}

/// Handle to stop a running sample feed.
#[derive(Clone)]
pub struct FeedHandle {
    running: Arc<AtomicBool>,
}

impl FeedHandle {
    /// Stops the feed; the capture loop exits before its next read.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Returns true while the feed is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recorder::MockAudioSource;

    #[tokio::test]
    async fn test_feed_forwards_chunks_until_exhausted() {
        let source = MockAudioSource::new().with_chunks(vec![vec![0.1; 4], vec![0.2; 4]]);
        let feed = SampleFeed::new(Box::new(source));
        let (tx, mut rx) = mpsc::channel(8);

        let task = tokio::task::spawn_blocking(move || feed.run(tx));

        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }

        assert_eq!(chunks.len(), 2);
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_feed_stops_via_handle() {
        // A source that never exhausts on its own.
        #[derive(Clone)]
        struct Endless;
        impl AudioSource for Endless {
            fn start(&mut self) -> Result<()> {
                Ok(())
            }
            fn stop(&mut self) -> Result<()> {
                Ok(())
            }
            fn read_samples(&mut self) -> Result<Vec<f32>> {
                std::thread::sleep(std::time::Duration::from_millis(1));
                Ok(vec![0.0; 16])
            }
        }

        let feed = SampleFeed::new(Box::new(Endless));
        let handle = feed.handle();
        let (tx, mut rx) = mpsc::channel(1024);

        let task = tokio::task::spawn_blocking(move || feed.run(tx));

        // Receive at least one chunk, then stop.
        assert!(rx.recv().await.is_some());
        handle.stop();

        while rx.recv().await.is_some() {}
        assert!(task.await.unwrap().is_ok());
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_feed_start_failure_propagates() {
        let source = MockAudioSource::new().with_start_failure();
        let feed = SampleFeed::new(Box::new(source));
        let (tx, _rx) = mpsc::channel(8);

        let result = tokio::task::spawn_blocking(move || feed.run(tx))
            .await
            .unwrap();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_feed_read_failure_propagates() {
        let source = MockAudioSource::new().with_read_failure();
        let feed = SampleFeed::new(Box::new(source));
        let (tx, _rx) = mpsc::channel(8);

        let result = tokio::task::spawn_blocking(move || feed.run(tx))
            .await
            .unwrap();
        assert!(result.is_err());
    }
}
