use std::path::Path;

use crate::error::Result;

/// Append-only buffer of captured PCM chunks.
///
/// Each chunk is one callback delivery from the audio driver: interleaved
/// f32 samples in [-1.0, 1.0] at a fixed channel count. Chunks are kept
/// separate while capturing and concatenated once on stop.
#[derive(Debug)]
pub struct AudioBuffer {
    chunks: Vec<Vec<f32>>,
    channels: u16,
}

impl AudioBuffer {
    pub fn new(channels: u16) -> Self {
        Self {
            chunks: Vec::new(),
            channels,
        }
    }

    pub fn push(&mut self, chunk: &[f32]) {
        self.chunks.push(chunk.to_vec());
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total frames buffered (samples across all chunks / channel count).
    pub fn frames(&self) -> usize {
        let samples: usize = self.chunks.iter().map(Vec::len).sum();
        samples / self.channels.max(1) as usize
    }

    /// Concatenate all chunks along the time axis.
    pub fn concat(self) -> Vec<f32> {
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut samples = Vec::with_capacity(total);
        for chunk in self.chunks {
            samples.extend(chunk);
        }
        samples
    }
}

/// Write f32 samples as a standard 16-bit signed PCM WAV file.
pub fn write_wav_i16(
    path: impl AsRef<Path>,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let quantized = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(quantized)?;
    }
    writer.finalize()?;

    Ok(())
}
