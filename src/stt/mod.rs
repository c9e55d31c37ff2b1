//! Speech-to-text backends.

pub mod remote;
pub mod transcriber;

pub use remote::RemoteWhisper;
pub use transcriber::{MockTranscriber, Transcriber};
