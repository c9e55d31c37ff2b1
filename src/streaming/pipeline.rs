//! Streaming pipeline orchestrator.
//!
//! Connects all stations together and manages the complete streaming flow:
//! Sample Feed → Windower → Encoder → Transcriber → Emitter → Sink
//!
//! Stations communicate over bounded channels and each closes its output by
//! dropping it once its input is drained. The orchestrator supervises the
//! station tasks, cancels the rest when one fails, and returns the first
//! error.

use crate::audio::recorder::AudioSource;
use crate::config::Config;
use crate::defaults;
use crate::error::{OverscribeError, Result};
use crate::predict::Emitter;
use crate::streaming::encoder::EncoderStation;
use crate::streaming::feed::SampleFeed;
use crate::streaming::sink::{TokenSink, run_sink};
use crate::streaming::transcriber::TranscriberStation;
use crate::streaming::windower::WindowerStation;
use crate::stt::transcriber::Transcriber;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Configuration for the streaming pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sample rate of the source in Hz.
    pub sample_rate: u32,
    /// Window width in samples.
    pub window_samples: usize,
    /// Hop between windows in samples.
    pub step_samples: usize,
    /// Number of recent windows retained for prediction.
    pub depth: usize,
    /// N-gram order used for token prediction.
    pub lookback: usize,
    /// Capture stops on its own after this long.
    pub record_for: Duration,
    /// Capacity of the sample channel, in chunks. Should hold at least one
    /// window's worth of capture so a transient stall loses no audio.
    pub sample_channel: usize,
    /// Capacity of the frame and transcript channels.
    pub frame_channel: usize,
    /// Capacity of the emitted token channel.
    pub token_channel: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let config = Config::default();
        Self {
            sample_rate: config.audio.sample_rate,
            window_samples: config.window_samples(),
            step_samples: config.step_samples(),
            depth: config.windowing.depth,
            lookback: config.windowing.lookback,
            record_for: Duration::from_secs(defaults::RECORD_FOR_SECS),
            sample_channel: defaults::SAMPLE_CHANNEL_CHUNKS,
            frame_channel: defaults::FRAME_CHANNEL,
            token_channel: defaults::TOKEN_CHANNEL,
        }
    }
}

impl PipelineConfig {
    /// Creates pipeline configuration from app config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            sample_rate: config.audio.sample_rate,
            window_samples: config.window_samples(),
            step_samples: config.step_samples(),
            depth: config.windowing.depth,
            lookback: config.windowing.lookback,
            ..Self::default()
        }
    }

    /// Sets the capture duration.
    pub fn with_record_for(mut self, record_for: Duration) -> Self {
        self.record_for = record_for;
        self
    }
}

/// Streaming pipeline that orchestrates all stations.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a new pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Creates a new pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline to completion.
    ///
    /// Capture ends when the source is exhausted, the recording duration
    /// elapses, or an interrupt arrives; downstream stations then drain in
    /// turn. The first station error cancels the rest and is returned after
    /// every task has finished. An interrupt is reported as an error so the
    /// process exits non-zero; the tokens already printed are the output.
    pub async fn run<T, S>(
        &self,
        source: Box<dyn AudioSource>,
        transcriber: T,
        sink: S,
    ) -> Result<()>
    where
        T: Transcriber + 'static,
        S: TokenSink + 'static,
    {
        let cancel = CancellationToken::new();

        // Fails before anything is spawned if the temp dir cannot be created.
        let encoder = EncoderStation::new(self.config.sample_rate)?;

        let (sample_tx, sample_rx) = mpsc::channel::<Vec<f32>>(self.config.sample_channel);
        let (frame_tx, frame_rx) = mpsc::channel::<Vec<f32>>(self.config.frame_channel);
        let (path_tx, path_rx) = mpsc::channel::<PathBuf>(self.config.frame_channel);
        let (text_tx, text_rx) = mpsc::channel::<String>(self.config.frame_channel);
        let (token_tx, token_rx) = mpsc::channel::<String>(self.config.token_channel);

        let feed = SampleFeed::new(source);
        let feed_handle = feed.handle();

        // Driver: stops capture when the recording duration elapses, an
        // interrupt arrives, or the supervisor cancels. Runs outside the
        // station set so a finished pipeline can wake it early.
        let driver = {
            let cancel = cancel.clone();
            let handle = feed_handle.clone();
            let record_for = self.config.record_for;

            tokio::spawn(async move {
                let result = tokio::select! {
                    _ = tokio::time::sleep(record_for) => Ok(()),
                    signal = tokio::signal::ctrl_c() => match signal {
                        Ok(()) => Err(OverscribeError::Interrupted),
                        Err(e) => Err(OverscribeError::Io(e)),
                    },
                    _ = cancel.cancelled() => Ok(()),
                };
                handle.stop();
                result
            })
        };

        let mut stations: JoinSet<Result<()>> = JoinSet::new();

        stations.spawn_blocking(move || feed.run(sample_tx));

        let windower =
            WindowerStation::new(self.config.window_samples, self.config.step_samples);
        stations.spawn(windower.run(sample_rx, frame_tx));

        stations.spawn(encoder.run(frame_rx, path_tx));

        let transcriber_station = TranscriberStation::new(transcriber);
        stations.spawn(transcriber_station.run(path_rx, text_tx));

        let emitter = Emitter::new(self.config.depth, self.config.lookback);
        stations.spawn(emitter.run(text_rx, token_tx));

        stations.spawn(run_sink(sink, token_rx));

        // Supervise: collect the first error, cancel the rest, wait for all.
        let mut first_error: Option<OverscribeError> = None;
        while let Some(joined) = stations.join_next().await {
            let failure = match joined {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e),
                Err(e) => Some(OverscribeError::Other(format!(
                    "pipeline task panicked: {}",
                    e
                ))),
            };

            if let Some(e) = failure {
                cancel.cancel();
                feed_handle.stop();
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        // All stations are done; wake the driver if it is still waiting.
        cancel.cancel();
        let driver_result = driver
            .await
            .map_err(|e| OverscribeError::Other(format!("driver task panicked: {}", e)))?;

        match first_error {
            Some(e) => Err(e),
            None => driver_result,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
