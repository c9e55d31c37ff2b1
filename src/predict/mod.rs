//! Token prediction from overlapping window transcripts.
//!
//! A short trailing history of transcribed windows is kept, each with its own
//! Markov chain; fuzzy alignment of recently emitted tokens against the
//! newest window decides how many new tokens to emit each round.

pub mod align;
pub mod chain;
pub mod emitter;
pub mod window_queue;

pub use align::{UNCERTAINTY_PENALTY, fuzzy_search};
pub use chain::{Chain, END_TOKEN, START_TOKEN};
pub use emitter::{Emitter, PROGRESS_TARGET};
pub use window_queue::WindowQ;
