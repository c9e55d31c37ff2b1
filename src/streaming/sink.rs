//! Token sinks for the streaming pipeline.

use crate::error::Result;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Consumer of emitted tokens.
///
/// This trait allows swapping implementations (stdout vs test collector).
pub trait TokenSink: Send {
    /// Consume one emitted token.
    fn write(&mut self, token: &str) -> Result<()>;
}

/// Sink that prints each token followed by a single space to stdout.
///
/// Stdout is flushed after every token so the transcript appears in real
/// time; status messages go to stderr and never interleave with it.
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSink for StdoutSink {
    fn write(&mut self, token: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        write!(out, "{} ", token)?;
        out.flush()?;
        Ok(())
    }
}

/// Sink that collects tokens into a shared vector, for tests.
#[derive(Default)]
pub struct CollectorSink {
    tokens: Arc<Mutex<Vec<String>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the collected tokens that stays valid after the
    /// sink has been moved into the pipeline.
    pub fn handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.tokens)
    }
}

impl TokenSink for CollectorSink {
    fn write(&mut self, token: &str) -> Result<()> {
        self.tokens
            .lock()
            .expect("collector sink lock poisoned")
            .push(token.to_string());
        Ok(())
    }
}

/// Runs a sink as the terminal pipeline task, consuming tokens until the
/// input channel closes.
pub async fn run_sink<S: TokenSink>(mut sink: S, mut input: mpsc::Receiver<String>) -> Result<()> {
    while let Some(token) = input.recv().await {
        sink.write(&token)?;
    }
    Ok(())
}
