//! Client for the external speech-recognition service.
//!
//! Three operations, all delegating to an OpenAI-compatible API:
//! batch transcription, streaming transcription and translation to
//! English. Pure pass-through with fixed parameters; no retry policy.

pub mod client;
pub mod stream;

pub use client::{RecognitionClient, Recognizer};
pub use stream::{SseParser, TranscriptAccumulator, TranscriptEvent};
