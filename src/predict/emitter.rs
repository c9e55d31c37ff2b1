//! Windowed Markov emitter.
//!
//! Consumes overlapping partial transcripts and fuses them into a single
//! monotonic token stream. Each transcript becomes a window in a short
//! trailing history; the emitter aligns its recently emitted tokens against
//! the newest window to estimate how far behind the speaker it is, then asks
//! the newest window's chain for enough continuations to catch up. When its
//! output has diverged from what was actually said, it re-anchors to the
//! current window and carries on.

use crate::error::{OverscribeError, Result};
use crate::predict::align::fuzzy_search;
use crate::predict::chain::{END_TOKEN, START_TOKEN, pad_left};
use crate::predict::window_queue::WindowQ;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::mpsc;

/// Fraction of the current window the emitter aims to have covered.
pub const PROGRESS_TARGET: f32 = 0.7;

static WITHIN_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*\]").expect("valid regex"));

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s]+").expect("valid regex"));

static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Why an emission round stopped.
enum EmitStop {
    /// The requested number of tokens was emitted.
    Budget,
    /// The chain reached the end sentinel; not an error.
    End,
    /// The chain has no continuation for the current prefix; recoverable.
    UnknownPrefix,
}

/// Predictor that fuses overlapping window transcripts into emitted tokens.
pub struct Emitter {
    depth: usize,
    ngram: usize,
    q: WindowQ,
    /// The last `ngram` emitted tokens; the prediction prefix and the
    /// alignment probe.
    emitted: Vec<String>,
    /// Exponentially-smoothed estimate of tokens per window, weight 1/depth.
    tokens_per_window: f32,
}

impl Emitter {
    /// Creates an emitter over a window history of `depth` with n-gram order
    /// `ngram`.
    ///
    /// # Panics
    /// Panics if `depth` or `ngram` is zero.
    pub fn new(depth: usize, ngram: usize) -> Self {
        assert!(depth > 0, "window depth must be at least 1");
        assert!(ngram > 0, "n-gram order must be at least 1");

        Self {
            depth,
            ngram,
            q: WindowQ::new(depth, ngram),
            emitted: Vec::with_capacity(ngram),
            tokens_per_window: 0.0,
        }
    }

    /// Ingests one raw transcript and returns the tokens to emit this round,
    /// in order. Transcripts that sanitize to nothing are discarded without
    /// touching the window history or the rolling statistic.
    pub fn process(&mut self, transcript: &str) -> Result<Vec<String>> {
        let clean = sanitize(transcript);
        if clean.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = tokenize(&clean);
        self.q.push_window(tokens.clone());

        let depth = self.depth as f32;
        self.tokens_per_window =
            (self.tokens_per_window * (depth - 1.0) + tokens.len() as f32) / depth;

        // No emission until the history is full; statistics are still warming up.
        if !self.q.full() {
            return Ok(Vec::new());
        }

        // Estimate where the emitted tokens sit inside the current window.
        // A value at or above 1.0 means we are ahead of this window entirely.
        let idx = fuzzy_search(&self.emitted, &tokens);
        let progress = (idx + self.emitted.len() as isize) as f32 / tokens.len() as f32;

        if progress >= PROGRESS_TARGET {
            return Ok(Vec::new());
        }

        // Integer truncation deliberately damps over-emission: near the
        // target this rounds down to zero and the round emits nothing.
        let to_emit =
            (self.tokens_per_window * (PROGRESS_TARGET - progress) / PROGRESS_TARGET) as usize;

        let mut out = Vec::new();
        let (emitted_now, stop) = self.emit_tokens(&mut out, to_emit);

        if matches!(stop, EmitStop::UnknownPrefix) && tokens.len() >= self.ngram {
            // The emitted suffix has diverged from what the speaker said.
            let remaining = to_emit as isize - emitted_now as isize;
            self.recover(&mut out, &tokens, idx, remaining)?;
        }

        Ok(out)
    }

    /// Emits up to `budget` tokens by repeatedly asking the newest chain for
    /// the continuation of the current prefix. Returns how many tokens were
    /// produced and why the round stopped.
    fn emit_tokens(&mut self, out: &mut Vec<String>, budget: usize) -> (usize, EmitStop) {
        for count in 0..budget {
            let prefix = pad_left(&self.emitted, START_TOKEN, self.ngram);

            match self.q.predict_next(&prefix) {
                None => return (count, EmitStop::UnknownPrefix),
                Some(token) if token == END_TOKEN => return (count, EmitStop::End),
                Some(token) => {
                    out.push(token.clone());
                    self.push_emitted(token);
                }
            }
        }

        (budget, EmitStop::Budget)
    }

    /// Re-anchors `emitted` to the current window after an unknown prefix.
    ///
    /// With a left-hanging alignment, the tokens directly after the
    /// overlapped region are emitted straight from the window first. The
    /// second emission pass must succeed: the anchor slice was just trained
    /// into the newest chain, so a miss there is an invariant violation.
    fn recover(
        &mut self,
        out: &mut Vec<String>,
        tokens: &[String],
        mut idx: isize,
        mut remaining: isize,
    ) -> Result<()> {
        while idx < 0 {
            out.push(tokens[(idx + self.ngram as isize) as usize].clone());
            remaining -= 1;
            idx += 1;
        }

        // Overwrite emitted as if the corrected tokens had been emitted in
        // the first place. The anchor is clamped so the slice stays inside
        // the window when the alignment landed near its end.
        let anchor = (idx as usize).min(tokens.len() - self.ngram);
        self.emitted = tokens[anchor..anchor + self.ngram].to_vec();

        let (_, stop) = self.emit_tokens(out, remaining.max(0) as usize);
        if matches!(stop, EmitStop::UnknownPrefix) {
            return Err(OverscribeError::Prediction {
                message: "no continuation after re-anchoring to the current window".to_string(),
            });
        }

        Ok(())
    }

    /// Slides a token into `emitted`, keeping at most `ngram` entries.
    fn push_emitted(&mut self, token: String) {
        if self.emitted.len() < self.ngram {
            self.emitted.push(token);
            return;
        }

        self.emitted.remove(0);
        self.emitted.push(token);
    }

    /// Runs the emitter as a station: reads transcripts until the input
    /// closes, sending each emitted token downstream as it is produced.
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<String>,
        output: mpsc::Sender<String>,
    ) -> Result<()> {
        while let Some(transcript) = input.recv().await {
            for token in self.process(&transcript)? {
                if output.send(token).await.is_err() {
                    return Ok(());
                }
            }
        }

        // TODO: flush tokens still predictable from the newest window once
        // the input ends; today the stream simply stops at the last emission.
        Ok(())
    }
}

/// Normalizes a raw transcriber response: bracketed annotations removed,
/// punctuation stripped, lowercased, whitespace collapsed to single spaces.
pub(crate) fn sanitize(s: &str) -> String {
    let without_brackets = WITHIN_BRACKETS.replace_all(s, "");
    let trimmed = without_brackets.trim();
    let alphanumeric = NON_ALPHANUMERIC.replace_all(trimmed, "");
    let lowered = alphanumeric.to_lowercase();

    SPACES.replace_all(&lowered, " ").trim().to_string()
}

/// Splits a sanitized transcript into tokens.
pub(crate) fn tokenize(s: &str) -> Vec<String> {
    s.split(' ').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_sanitize_removes_bracketed_annotations() {
        assert_eq!(sanitize("[BLANK_AUDIO]"), "");
        assert_eq!(sanitize("well [MUSIC] then"), "well then");
    }

    #[test]
    fn test_sanitize_strips_punctuation_and_lowercases() {
        assert_eq!(sanitize(" Hello, there! "), "hello there");
        assert_eq!(sanitize("It's 3 o'clock."), "its 3 oclock");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize("a \t b\n\nc"), "a b c");
        assert_eq!(sanitize("trailing dot ."), "trailing dot");
    }

    #[test]
    fn test_tokenize_splits_on_single_spaces() {
        assert_eq!(tokenize("a b c"), toks("a b c"));
        assert_eq!(tokenize("word"), vec!["word".to_string()]);
    }

    #[test]
    fn test_no_emission_until_history_full() {
        let mut emitter = Emitter::new(3, 3);
        let text = "the quick brown fox jumps over the lazy dog";

        assert!(emitter.process(text).unwrap().is_empty());
        assert!(emitter.process(text).unwrap().is_empty());

        let third = emitter.process(text).unwrap();
        assert!(!third.is_empty());
    }

    #[test]
    fn test_first_emission_follows_window_start() {
        let mut emitter = Emitter::new(3, 3);
        let text = "the quick brown fox jumps over the lazy dog";

        emitter.process(text).unwrap();
        emitter.process(text).unwrap();
        let out = emitter.process(text).unwrap();

        // tokens_per_window is 6.33 after three windows of nine tokens, so
        // the first full round emits six tokens from the window start.
        assert_eq!(out, toks("the quick brown fox jumps over"));
        assert_eq!(emitter.emitted, toks("fox jumps over"));
    }

    #[test]
    fn test_empty_transcript_discarded() {
        let mut emitter = Emitter::new(2, 2);
        emitter.process("hello world again").unwrap();

        let before = emitter.tokens_per_window;
        assert!(emitter.process("[INAUDIBLE]").unwrap().is_empty());
        assert!(emitter.process("   ...!?  ").unwrap().is_empty());

        assert_eq!(emitter.q.len(), 1);
        assert_eq!(emitter.tokens_per_window, before);
    }

    #[test]
    fn test_tokens_per_window_exponential_average() {
        let mut emitter = Emitter::new(2, 2);
        emitter.process("one two three four").unwrap();
        assert_eq!(emitter.tokens_per_window, 2.0);
        emitter.process("one two three four five six").unwrap();
        assert_eq!(emitter.tokens_per_window, 4.0);
    }

    #[test]
    fn test_no_emission_when_ahead_of_window() {
        let mut emitter = Emitter::new(1, 2);
        let out = emitter.process("alpha beta gamma").unwrap();
        assert_eq!(out, toks("alpha beta gamma"));

        // The emitted suffix now sits at the end of an identical window:
        // progress is 1.0 and nothing more is emitted.
        let out = emitter.process("alpha beta gamma").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_determinism_across_runs() {
        let transcripts = [
            "so this is a story all about how",
            "is a story all about how my life got",
            "story all about how my life got flipped turned",
            "about how my life got flipped turned upside down",
            "my life got flipped turned upside down and id",
        ];

        let run = || {
            let mut emitter = Emitter::new(3, 3);
            let mut out = Vec::new();
            for t in transcripts {
                out.extend(emitter.process(t).unwrap());
            }
            out
        };

        let first = run();
        let second = run();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_recovery_reanchors_to_current_window() {
        let mut emitter = Emitter::new(2, 2);

        // Two identical windows fill the history and emit a first batch.
        let opening = "alpha beta gamma delta epsilon zeta eta theta";
        emitter.process(opening).unwrap();
        let out = emitter.process(opening).unwrap();
        assert!(!out.is_empty());
        assert!(!emitter.emitted.is_empty());

        // An entirely new vocabulary: the emitted prefix is unknown to the
        // newest chain, forcing recovery.
        let replacement = "uniform quantum lattice resonance cascade interferometer";
        let out = emitter.process(replacement).unwrap();
        assert!(!out.is_empty());

        // Closure: the emitted suffix is a contiguous slice of the window.
        let window = toks(replacement);
        let found = window
            .windows(emitter.emitted.len())
            .any(|slice| slice == emitter.emitted.as_slice());
        assert!(
            found,
            "emitted {:?} is not a slice of {:?}",
            emitter.emitted, window
        );
    }

    #[test]
    fn test_recovery_skipped_for_short_windows() {
        let mut emitter = Emitter::new(2, 3);
        emitter.process("alpha beta gamma delta epsilon").unwrap();
        emitter.process("alpha beta gamma delta epsilon").unwrap();

        // A two-token window is shorter than the n-gram order: the unknown
        // prefix is absorbed without recovery and without error.
        let out = emitter
            .process("electroencephalography otorhinolaryngology")
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_station_forwards_tokens() {
        let emitter = Emitter::new(1, 2);
        let (input_tx, input_rx) = mpsc::channel(4);
        let (output_tx, mut output_rx) = mpsc::channel(64);

        let task = tokio::spawn(async move { emitter.run(input_rx, output_tx).await });

        input_tx.send("come on in".to_string()).await.unwrap();
        drop(input_tx);

        let mut received = Vec::new();
        while let Some(token) = output_rx.recv().await {
            received.push(token);
        }

        assert_eq!(received, toks("come on in"));
        assert!(task.await.unwrap().is_ok());
    }
}
