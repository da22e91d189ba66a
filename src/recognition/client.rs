use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use super::stream::{SseParser, TranscriptAccumulator, TranscriptEvent};
use crate::config::Config;
use crate::error::{Error, Result};

/// Fixed disambiguation prompt sent with every transcription request.
const TRANSCRIPTION_PROMPT: &str = "The following conversation is a test conversation.";

/// Apply one SSE payload to the accumulator, echoing new fragments.
fn apply_payload(payload: &str, accumulator: &mut TranscriptAccumulator) {
    let Some(event) = TranscriptEvent::parse(payload) else {
        return;
    };
    if let Some(fragment) = accumulator.apply(event) {
        print!("{fragment}");
        let _ = std::io::stdout().flush();
    }
}

/// Speech-recognition operations. Implemented over HTTP by
/// [`RecognitionClient`]; handlers depend on the trait so tests can
/// substitute a canned implementation.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Batch transcription of an audio file.
    async fn transcribe(&self, path: &Path) -> Result<String>;

    /// Translation of an audio file to English.
    async fn translate(&self, path: &Path) -> Result<String>;

    /// Streaming transcription; echoes fragments to stdout as they arrive
    /// and returns the accumulated text at stream end.
    async fn stream_transcribe(&self, path: &Path) -> Result<String>;
}

/// HTTP client for an OpenAI-compatible audio API.
///
/// Holds a pooled reqwest client with the bearer token installed as a
/// default header. Every call is a single request with fixed parameters;
/// there is no retry and the streaming call carries no timeout.
pub struct RecognitionClient {
    http: reqwest::Client,
    api_base: String,
    model_transcribe: String,
    model_stream: String,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    text: String,
}

impl RecognitionClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", config.openai_api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|e| Error::Internal(format!("invalid API key header: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base: config.openai_api_base.trim_end_matches('/').to_string(),
            model_transcribe: config.model_transcribe.clone(),
            model_stream: config.model_stream.clone(),
        })
    }

    async fn file_part(path: &Path) -> Result<Part> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        Ok(Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")?)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Recognition(format!(
            "service returned {status}: {body}"
        )))
    }
}

#[async_trait]
impl Recognizer for RecognitionClient {
    async fn transcribe(&self, path: &Path) -> Result<String> {
        info!("Transcribing audio: {}", path.display());

        let form = Form::new()
            .part("file", Self::file_part(path).await?)
            .text("model", self.model_transcribe.clone())
            .text("response_format", "text")
            .text("prompt", TRANSCRIPTION_PROMPT);

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.api_base))
            .multipart(form)
            .send()
            .await?;

        let text = Self::check(response).await?.text().await?;

        info!("Transcription completed");
        Ok(text)
    }

    async fn translate(&self, path: &Path) -> Result<String> {
        info!("Translating audio: {}", path.display());

        let form = Form::new()
            .part("file", Self::file_part(path).await?)
            .text("model", self.model_transcribe.clone());

        let response = self
            .http
            .post(format!("{}/audio/translations", self.api_base))
            .multipart(form)
            .send()
            .await?;

        let translation: TranslationResponse = Self::check(response).await?.json().await?;

        info!("Translation completed");
        Ok(translation.text)
    }

    async fn stream_transcribe(&self, path: &Path) -> Result<String> {
        info!("Starting streaming transcription: {}", path.display());

        let form = Form::new()
            .part("file", Self::file_part(path).await?)
            .text("model", self.model_stream.clone())
            .text("response_format", "text")
            .text("prompt", TRANSCRIPTION_PROMPT)
            .text("stream", "true");

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.api_base))
            .multipart(form)
            .send()
            .await?;

        let mut body = Self::check(response).await?.bytes_stream();

        let mut parser = SseParser::new();
        let mut accumulator = TranscriptAccumulator::new();

        // Blocks until the remote stream ends; there is no timeout and no
        // cancellation hook.
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for payload in parser.push(&chunk) {
                apply_payload(&payload, &mut accumulator);
            }
            if parser.is_finished() {
                break;
            }
        }
        if let Some(payload) = parser.finish() {
            apply_payload(&payload, &mut accumulator);
        }
        println!();

        info!("Streaming transcription completed");
        Ok(accumulator.into_text())
    }
}
