use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::recording::RecordingSession;

/// Microphone capture wired to a recording session.
///
/// Opens the default input device at the session's sample rate and channel
/// count and forwards every driver callback to `session.push_chunk`. The
/// callback runs on the capture thread owned by the audio subsystem;
/// dropping the `Microphone` stops the stream.
pub struct Microphone {
    _stream: cpal::Stream,
}

impl Microphone {
    pub fn start(session: Arc<RecordingSession>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Internal("no input device available".into()))?;

        let supported = device
            .default_input_config()
            .map_err(|e| Error::Internal(format!("failed to get input config: {e}")))?;

        let config = cpal::StreamConfig {
            channels: session.channels(),
            sample_rate: cpal::SampleRate(session.sample_rate()),
            buffer_size: cpal::BufferSize::Default,
        };

        info!(
            "Starting audio capture: {}Hz, {} channels",
            session.sample_rate(),
            session.channels()
        );

        let err_fn = |err| error!("Audio stream error: {}", err);

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                let session = Arc::clone(&session);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _| session.push_chunk(data),
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let session = Arc::clone(&session);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _| {
                        let samples: Vec<f32> =
                            data.iter().map(|&s| s as f32 / 32768.0).collect();
                        session.push_chunk(&samples);
                    },
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::U16 => {
                let session = Arc::clone(&session);
                device.build_input_stream(
                    &config,
                    move |data: &[u16], _| {
                        let samples: Vec<f32> = data
                            .iter()
                            .map(|&s| (s as f32 - 32768.0) / 32768.0)
                            .collect();
                        session.push_chunk(&samples);
                    },
                    err_fn,
                    None,
                )
            }
            format => {
                return Err(Error::Internal(format!(
                    "unsupported input sample format: {format:?}"
                )))
            }
        }
        .map_err(|e| Error::Internal(format!("failed to build input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| Error::Internal(format!("failed to start audio stream: {e}")))?;

        Ok(Self { _stream: stream })
    }
}
