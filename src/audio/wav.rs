//! WAV encoding for windows and a WAV-file audio source for pipe mode.

use crate::audio::recorder::AudioSource;
use crate::defaults::SAMPLE_RATE;
use crate::error::{OverscribeError, Result};
use std::io::{Cursor, Read};

/// Encodes mono f32 samples as a 16-bit PCM WAV file in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| OverscribeError::WindowEncode {
            message: format!("Failed to initialize WAV writer: {}", e),
        })?;

    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| OverscribeError::WindowEncode {
                message: format!("Failed to write WAV sample: {}", e),
            })?;
    }

    writer
        .finalize()
        .map_err(|e| OverscribeError::WindowEncode {
            message: format!("Failed to finalize WAV data: {}", e),
        })?;

    Ok(cursor.into_inner())
}

/// Audio source that reads from WAV file data.
/// Supports arbitrary sample rates and channels, resampling to 16kHz mono.
pub struct WavAudioSource {
    samples: Vec<f32>,
    position: usize,
    chunk_size: usize,
}

impl WavAudioSource {
    /// Create from any reader (for testing/flexibility).
    pub fn from_reader(reader: Box<dyn Read + Send>) -> Result<Self> {
        let mut wav_reader =
            hound::WavReader::new(reader).map_err(|e| OverscribeError::AudioCapture {
                message: format!("Failed to parse WAV file: {}", e),
            })?;

        let spec = wav_reader.spec();
        let source_rate = spec.sample_rate;
        let source_channels = spec.channels;

        // Read all samples from the WAV file
        let raw_samples: Vec<i16> = wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| OverscribeError::AudioCapture {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        // Convert to mono if stereo
        let mono_samples: Vec<i16> = if source_channels == 2 {
            raw_samples
                .chunks_exact(2)
                .map(|chunk| {
                    let left = chunk[0] as i32;
                    let right = chunk[1] as i32;
                    ((left + right) / 2) as i16
                })
                .collect()
        } else {
            raw_samples
        };

        // Resample to 16kHz if needed
        let resampled = if source_rate != SAMPLE_RATE {
            resample(&mono_samples, source_rate, SAMPLE_RATE)
        } else {
            mono_samples
        };

        let samples = resampled
            .into_iter()
            .map(|s| s as f32 / i16::MAX as f32)
            .collect();

        // 100ms chunks at 16kHz
        let chunk_size = 1600;

        Ok(Self {
            samples,
            position: 0,
            chunk_size,
        })
    }

    /// Create from stdin.
    pub fn from_stdin() -> Result<Self> {
        // Read all data from stdin into memory first (StdinLock is not Send)
        let mut buffer = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .map_err(|e| OverscribeError::AudioCapture {
                message: format!("Failed to read from stdin: {}", e),
            })?;

        Self::from_reader(Box::new(Cursor::new(buffer)))
    }
}

impl AudioSource for WavAudioSource {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<f32>> {
        if self.position >= self.samples.len() {
            return Ok(Vec::new());
        }

        let end = std::cmp::min(self.position + self.chunk_size, self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;

        Ok(chunk)
    }
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 * ratio;
            let idx = src_pos.floor() as usize;
            let frac = src_pos - idx as f64;

            if idx + 1 < samples.len() {
                let a = samples[idx] as f64;
                let b = samples[idx + 1] as f64;
                (a + (b - a) * frac) as i16
            } else if idx < samples.len() {
                samples[idx]
            } else {
                0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wav_header() {
        let samples = vec![0.0f32; 160];
        let bytes = encode_wav(&samples, 16000).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // 44-byte header + 2 bytes per sample
        assert_eq!(bytes.len(), 44 + 160 * 2);
    }

    #[test]
    fn test_encode_wav_roundtrip() {
        let samples = vec![0.0, 0.5, -0.5, 1.0, -1.0];
        let bytes = encode_wav(&samples, 16000).unwrap();

        let source = WavAudioSource::from_reader(Box::new(Cursor::new(bytes))).unwrap();
        assert_eq!(source.samples.len(), 5);
        assert!((source.samples[1] - 0.5).abs() < 0.001);
        assert!((source.samples[3] - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_wav_source_chunked_reads() {
        let samples = vec![0.25f32; 4000];
        let bytes = encode_wav(&samples, 16000).unwrap();

        let mut source = WavAudioSource::from_reader(Box::new(Cursor::new(bytes))).unwrap();
        assert_eq!(source.read_samples().unwrap().len(), 1600);
        assert_eq!(source.read_samples().unwrap().len(), 1600);
        assert_eq!(source.read_samples().unwrap().len(), 800);
        assert!(source.read_samples().unwrap().is_empty());
    }

    #[test]
    fn test_wav_source_rejects_garbage() {
        let garbage = vec![1u8, 2, 3, 4, 5];
        assert!(WavAudioSource::from_reader(Box::new(Cursor::new(garbage))).is_err());
    }

    #[test]
    fn test_resample_halves_length() {
        let samples = vec![100i16; 1000];
        let out = resample(&samples, 32000, 16000);
        assert_eq!(out.len(), 500);
    }
}
