use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::info;

use crate::error::{Error, Result};

/// A PCM WAV file decoded into floating-point samples.
///
/// Sample rate and channel count come from the file header, never from a
/// configured default; playback must honor them.
#[derive(Debug)]
pub struct AudioFile {
    pub path: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_seconds: f64,
    pub samples: Vec<f32>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }

        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path)?;
        let spec = reader.spec();

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => reader
                .into_samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32767.0))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            (SampleFormat::Int, 32) => reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483647.0))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            (_, bits) => return Err(Error::UnsupportedFormat { bits }),
        };

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            duration_seconds,
            samples,
        })
    }
}
