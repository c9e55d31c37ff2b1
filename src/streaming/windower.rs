//! Sliding-window cutter for the streaming pipeline.
//!
//! Turns a stream of arbitrary-size sample chunks into fixed-width frames
//! produced every `step` samples. With `step < width` consecutive frames
//! overlap; with `step == width` they tile; with `step > width` the samples
//! between frames are discarded.

use crate::error::Result;
use tokio::sync::mpsc;

/// Cuts a chunked sample stream into fixed-width frames with a fixed hop.
///
/// The internal buffer starts zeroed, so the first frames are left-padded
/// with `width - step` zero samples when `step < width`. [`flush`](Self::flush)
/// injects one buffer's worth of zeros so every sample seen before end of
/// input lands in at least one frame.
pub struct Windower<T> {
    step: usize,
    /// New samples still needed before the next frame is emitted.
    remaining: usize,
    buf: Vec<T>,
}

impl<T: Copy + Default> Windower<T> {
    /// Creates a windower producing frames of `width` samples every `step` samples.
    ///
    /// # Panics
    /// Panics if `width` or `step` is zero.
    pub fn new(width: usize, step: usize) -> Self {
        assert!(
            width > 0 && step > 0,
            "window width and step must be positive"
        );

        Self {
            step,
            remaining: step,
            buf: vec![T::default(); width],
        }
    }

    /// Returns the frame width in samples.
    pub fn width(&self) -> usize {
        self.buf.len()
    }

    /// Returns the hop between consecutive frames in samples.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Consumes a chunk and returns any frames completed by it, in order.
    pub fn process(&mut self, mut chunk: &[T]) -> Vec<Vec<T>> {
        let width = self.buf.len();
        let mut frames = Vec::new();

        while !chunk.is_empty() {
            // Samples falling into the inter-frame gap (step > width) never
            // enter the buffer.
            if self.remaining > width {
                let gap = self.remaining - width;
                if gap >= chunk.len() {
                    self.remaining -= chunk.len();
                    break;
                }
                self.remaining -= gap;
                chunk = &chunk[gap..];
            }

            let n = self.remaining.min(chunk.len());
            let start = width - self.remaining;
            self.buf[start..start + n].copy_from_slice(&chunk[..n]);
            self.remaining -= n;
            chunk = &chunk[n..];

            if self.remaining == 0 {
                frames.push(self.buf.clone());
                self.remaining = self.step;

                // Keep the trailing width - step samples for the next frame.
                if width > self.step {
                    self.buf.copy_within(self.step.., 0);
                }
            }
        }

        frames
    }

    /// Injects one buffer's worth of zero samples and returns the resulting
    /// frames. Any partially-filled frame comes out right-padded with zeros.
    pub fn flush(&mut self) -> Vec<Vec<T>> {
        let zeros = vec![T::default(); self.buf.len()];
        self.process(&zeros)
    }
}

/// Station wrapping a [`Windower`] over f32 sample chunks.
pub struct WindowerStation {
    windower: Windower<f32>,
}

impl WindowerStation {
    /// Creates a station cutting `width`-sample frames every `step` samples.
    pub fn new(width: usize, step: usize) -> Self {
        Self {
            windower: Windower::new(width, step),
        }
    }

    /// Runs the station: reads sample chunks until the input closes, then
    /// flushes and closes the output by dropping it.
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<Vec<f32>>,
        output: mpsc::Sender<Vec<f32>>,
    ) -> Result<()> {
        while let Some(chunk) = input.recv().await {
            for frame in self.windower.process(&chunk) {
                if output.send(frame).await.is_err() {
                    // Downstream hung up; the pipeline is shutting down.
                    return Ok(());
                }
            }
        }

        for frame in self.windower.flush() {
            if output.send(frame).await.is_err() {
                return Ok(());
            }
        }

        Ok(())
    }
}
