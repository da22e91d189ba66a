pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod recognition;
pub mod recording;

pub use audio::{write_wav_i16, AudioBuffer, AudioFile, Microphone};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{create_router, validate_upload, AppState, TempUpload};
pub use recognition::{
    RecognitionClient, Recognizer, SseParser, TranscriptAccumulator, TranscriptEvent,
};
pub use recording::{Recording, RecordingSession};
