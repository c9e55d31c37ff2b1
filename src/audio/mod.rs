//! Audio capture and encoding.

pub mod capture;
pub mod recorder;
pub mod wav;

pub use capture::{CpalAudioSource, list_devices, suppress_audio_warnings};
pub use recorder::{AudioSource, MockAudioSource};
pub use wav::{WavAudioSource, encode_wav};
