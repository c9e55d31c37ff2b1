//! Streaming pipeline for live transcript fusion.
//!
//! Implements a multi-station pipeline architecture:
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────┐    ┌───────────┐    ┌─────────┐
//! │  Sample  │───▶│ Windower │───▶│ Encoder │───▶│Transcriber│───▶│ Emitter │───▶ Sink
//! │   Feed   │    │          │    │  (WAV)  │    │  (HTTP)   │    │ (Markov)│
//! └──────────┘    └──────────┘    └─────────┘    └───────────┘    └─────────┘
//!   samples     overlapping frames    paths         transcripts      tokens
//! ```
//!
//! Every arrow is a bounded channel; upstream stations block when downstream
//! is slow. A station closes its output by dropping it once its input is
//! drained, and never closes a channel it did not create.

pub mod encoder;
pub mod feed;
pub mod pipeline;
pub mod queue;
pub mod sink;
pub mod transcriber;
pub mod windower;

pub use encoder::EncoderStation;
pub use feed::{FeedHandle, SampleFeed};
pub use pipeline::{Pipeline, PipelineConfig};
pub use queue::OverwriteQueue;
pub use sink::{CollectorSink, StdoutSink, TokenSink};
pub use transcriber::TranscriberStation;
pub use windower::{Windower, WindowerStation};
