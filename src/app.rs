//! Application entry points.
//!
//! Wires the complete flow: capture → window → encode → transcribe → emit.

use crate::audio::capture::{CpalAudioSource, list_devices, suppress_audio_warnings};
use crate::audio::recorder::AudioSource;
use crate::audio::wav::WavAudioSource;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::streaming::pipeline::{Pipeline, PipelineConfig};
use crate::streaming::sink::StdoutSink;
use crate::stt::remote::RemoteWhisper;
use std::time::Duration;

/// Run the default command: capture audio and print the fused token stream.
///
/// CLI flags override the file configuration. Status goes to stderr; the
/// token stream is the only thing written to stdout.
pub async fn run_listen_command(mut config: Config, cli: &Cli) -> Result<()> {
    // Suppress noisy JACK/ALSA warnings before audio init
    suppress_audio_warnings();

    // Apply CLI overrides
    if let Some(url) = &cli.url {
        config.transcriber.url = url.clone();
    }
    if let Some(device) = &cli.device {
        config.audio.device = Some(device.clone());
    }
    if let Some(duration) = cli.window_duration {
        config.windowing.window_ms = duration.as_millis() as u32;
    }
    if let Some(step) = cli.window_step {
        config.windowing.step_ms = step.as_millis() as u32;
    }
    if let Some(depth) = cli.depth {
        config.windowing.depth = depth;
    }
    if let Some(lookback) = cli.lookback {
        config.windowing.lookback = lookback;
    }
    if let Some(timeout) = cli.timeout {
        config.transcriber.timeout_ms = timeout.as_millis() as u64;
    }

    config.validate()?;

    let source: Box<dyn AudioSource> = if cli.stdin {
        Box::new(WavAudioSource::from_stdin()?)
    } else {
        Box::new(CpalAudioSource::new(config.audio.device.as_deref())?)
    };

    let transcriber = RemoteWhisper::new(
        &config.transcriber.url,
        Duration::from_millis(config.transcriber.timeout_ms),
    );

    let record_for = cli
        .record_for
        .unwrap_or(Duration::from_secs(crate::defaults::RECORD_FOR_SECS));

    if !cli.quiet {
        eprintln!("Transcribing via {}", config.transcriber.url);
        if cli.verbose >= 1 {
            eprintln!(
                "Windows: {}ms every {}ms, depth {}, lookback {}",
                config.windowing.window_ms,
                config.windowing.step_ms,
                config.windowing.depth,
                config.windowing.lookback,
            );
        }
        if cli.stdin {
            eprintln!("Reading WAV stream from stdin...");
        } else {
            eprintln!("Microphone is live, listening...");
        }
    }

    let pipeline_config = PipelineConfig::from_config(&config).with_record_for(record_for);
    let pipeline = Pipeline::with_config(pipeline_config);

    pipeline.run(source, transcriber, StdoutSink::new()).await?;

    if !cli.quiet {
        // The token stream has no trailing newline of its own.
        eprintln!();
        eprintln!("Done.");
    }

    Ok(())
}

/// Run the devices command: list capture devices usable with --device.
pub fn run_devices_command() -> Result<()> {
    let devices = list_devices()?;

    if devices.is_empty() {
        eprintln!("No audio input devices found.");
        return Ok(());
    }

    for device in devices {
        println!("{}", device);
    }

    Ok(())
}
