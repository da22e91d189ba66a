use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use super::file::AudioFile;
use crate::error::{Error, Result};

/// Play a WAV file on the default output device, blocking until done.
///
/// The output stream is opened at the rate and channel count declared in
/// the file header. Completion is signalled from the output callback once
/// every sample has been handed to the driver.
pub fn play(path: impl AsRef<Path>) -> Result<()> {
    let audio = AudioFile::open(path)?;

    info!("Playing audio: {}", audio.path);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Internal("no output device available".into()))?;

    let config = cpal::StreamConfig {
        channels: audio.channels,
        sample_rate: cpal::SampleRate(audio.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let duration = audio.duration_seconds;
    let samples = Arc::new(audio.samples);
    let position = Arc::new(Mutex::new(0usize));
    let (done_tx, done_rx) = mpsc::channel::<()>();

    let stream = {
        let samples = Arc::clone(&samples);
        let position = Arc::clone(&position);
        device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    let mut pos = position.lock().expect("playback position lock poisoned");
                    for out in data.iter_mut() {
                        *out = samples.get(*pos).copied().unwrap_or(0.0);
                        *pos += 1;
                    }
                    if *pos >= samples.len() {
                        // Receiver may already be gone on repeated signals.
                        let _ = done_tx.send(());
                    }
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| Error::Internal(format!("failed to build output stream: {e}")))?
    };

    stream
        .play()
        .map_err(|e| Error::Internal(format!("failed to start playback: {e}")))?;

    // Wait for the callback to drain the sample buffer, with a margin for
    // driver latency.
    let timeout = Duration::from_secs_f64(duration + 5.0);
    done_rx
        .recv_timeout(timeout)
        .map_err(|_| Error::Internal("playback did not complete".into()))?;

    drop(stream);
    info!("Audio playback completed");

    Ok(())
}
