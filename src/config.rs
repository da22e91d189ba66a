use anyhow::{Context, Result};
use serde::Deserialize;

/// Application settings, sourced from the environment.
///
/// `OPENAI_API_KEY` has no default; `load()` fails at startup without it.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app_name: String,

    pub openai_api_key: String,
    pub openai_api_base: String,
    pub model_transcribe: String,
    pub model_stream: String,

    pub sample_rate: u32,
    pub channels: u16,
    pub recording_filename: String,

    pub upload_dir: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("app_name", "voicebridge")?
            .set_default("openai_api_base", "https://api.openai.com/v1")?
            .set_default("model_transcribe", "whisper-1")?
            .set_default("model_stream", "gpt-4o-mini-transcribe")?
            .set_default("sample_rate", 44100)?
            .set_default("channels", 1)?
            .set_default("recording_filename", "recording.wav")?
            .set_default("upload_dir", "uploads")?
            .set_default("max_upload_bytes", 25 * 1024 * 1024)?
            .add_source(config::Environment::default())
            .build()?;

        settings
            .try_deserialize()
            .context("Invalid configuration (is OPENAI_API_KEY set?)")
    }
}
