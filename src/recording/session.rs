use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::audio::{write_wav_i16, AudioBuffer};
use crate::error::{Error, Result};

/// A finished recording on disk.
#[derive(Debug, Clone)]
pub struct Recording {
    pub path: String,
    /// Duration in seconds (total frames / sample rate).
    pub duration: f64,
}

/// One microphone recording session.
///
/// The audio driver delivers chunks on its own capture thread via
/// `push_chunk`; the controlling thread arms, disarms and stops. The armed
/// flag and buffer are the only shared state, synchronized so a stop racing
/// an in-flight callback cannot tear the buffer. A delivery that loses the
/// race against `disarm` is dropped, not buffered.
pub struct RecordingSession {
    sample_rate: u32,
    channels: u16,
    armed: AtomicBool,
    buffer: Mutex<AudioBuffer>,
    started_at: DateTime<Utc>,
}

impl RecordingSession {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            armed: AtomicBool::new(false),
            buffer: Mutex::new(AudioBuffer::new(channels)),
            started_at: Utc::now(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Append one callback delivery of interleaved f32 samples.
    ///
    /// Called from the capture thread. Deliveries while disarmed are
    /// dropped.
    pub fn push_chunk(&self, chunk: &[f32]) {
        if !self.is_armed() {
            return;
        }
        let mut buffer = self.buffer.lock().expect("audio buffer lock poisoned");
        buffer.push(chunk);
    }

    /// Disarm, concatenate the buffered chunks and write them to `path` as
    /// a 16-bit PCM WAV file.
    ///
    /// Fails with `EmptyRecording` (and writes no file) if the driver never
    /// delivered a chunk before stop.
    pub fn stop(&self, path: impl AsRef<Path>) -> Result<Recording> {
        self.disarm();

        let buffer = {
            let mut guard = self.buffer.lock().expect("audio buffer lock poisoned");
            std::mem::replace(&mut *guard, AudioBuffer::new(self.channels))
        };

        if buffer.is_empty() {
            return Err(Error::EmptyRecording);
        }

        let duration = buffer.frames() as f64 / self.sample_rate as f64;
        let samples = buffer.concat();

        let path = path.as_ref();
        write_wav_i16(path, &samples, self.sample_rate, self.channels)?;

        info!(
            "Audio saved: {} ({:.2}s, session started {})",
            path.display(),
            duration,
            self.started_at.to_rfc3339()
        );

        Ok(Recording {
            path: path.display().to_string(),
            duration,
        })
    }
}
