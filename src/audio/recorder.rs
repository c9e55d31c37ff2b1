use crate::defaults;
use crate::error::{OverscribeError, Result};

/// Trait for audio source devices.
///
/// This trait allows swapping implementations (real audio device vs mock).
pub trait AudioSource: Send {
    /// Start capturing audio from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read the next chunk of mono samples in [-1, 1].
    ///
    /// Blocks until samples are available. An empty chunk means the source
    /// is exhausted.
    fn read_samples(&mut self) -> Result<Vec<f32>>;
}

/// Configuration for audio source initialization
#[derive(Debug, Clone)]
pub struct AudioSourceConfig {
    pub sample_rate: u32,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

/// Mock audio source for testing
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    chunks: Vec<Vec<f32>>,
    position: usize,
    should_fail_start: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockAudioSource {
    /// Create a new mock audio source with no samples
    pub fn new() -> Self {
        Self {
            is_started: false,
            chunks: Vec::new(),
            position: 0,
            should_fail_start: false,
            should_fail_read: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Configure the mock to yield the given chunks, then report exhaustion
    pub fn with_chunks(mut self, chunks: Vec<Vec<f32>>) -> Self {
        self.chunks = chunks;
        self
    }

    /// Configure the mock to yield `samples` split into `chunk_size` pieces
    pub fn with_samples(self, samples: Vec<f32>, chunk_size: usize) -> Self {
        let chunks = samples.chunks(chunk_size).map(<[f32]>::to_vec).collect();
        self.with_chunks(chunks)
    }

    /// Configure the mock to fail on start
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on read
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Check if the audio source is started
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(OverscribeError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<f32>> {
        if self.should_fail_read {
            return Err(OverscribeError::AudioCapture {
                message: self.error_message.clone(),
            });
        }

        if self.position >= self.chunks.len() {
            return Ok(Vec::new());
        }

        let chunk = self.chunks[self.position].clone();
        self.position += 1;
        Ok(chunk)
    }
}
