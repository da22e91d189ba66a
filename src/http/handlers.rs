use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{error, info};

use super::state::AppState;
use super::upload::{validate_upload, TempUpload};
use crate::audio;
use crate::error::{Error, Result};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub app_name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TranslationResponse {
    pub translation: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessingResponse {
    pub transcription: String,
    pub translation: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidFileType => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("Request failed: {}", self);
        let body = ErrorResponse {
            error: self.category().to_string(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Upload extraction
// ============================================================================

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of a multipart body and validate it.
async fn extract_upload(mut multipart: Multipart) -> Result<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);

        info!(
            "Upload received: filename={:?}, content_type={:?}",
            filename, content_type
        );

        validate_upload(filename.as_deref(), content_type.as_deref())?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("failed to read upload: {e}")))?;

        return Ok(Upload {
            filename: filename.unwrap_or_else(|| "upload".to_string()),
            bytes: bytes.to_vec(),
        });
    }

    Err(Error::InvalidFileType)
}

/// Resolve a path parameter to a file inside the upload directory.
///
/// Path separators are rejected; the parameter is a bare filename, not a
/// path.
fn resolve_stored_file(upload_dir: &str, filename: &str) -> Result<std::path::PathBuf> {
    if filename.contains('/') || filename.contains('\\') || filename == ".." {
        return Err(Error::NotFound(filename.to_string()));
    }
    let path = std::path::Path::new(upload_dir).join(filename);
    if !path.exists() {
        return Err(Error::NotFound(filename.to_string()));
    }
    Ok(path)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        app_name: state.config.app_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /record
///
/// The recording flow needs a stop signal (the CLI waits for Enter), and
/// this endpoint has none: a capture started here could never terminate.
/// It answers 501 until a stop mechanism is designed rather than hanging
/// the connection.
pub async fn record() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(ErrorResponse {
            error: "not_implemented".to_string(),
            detail: "recording over HTTP has no stop signal; use the voicebridge-cli binary"
                .to_string(),
        }),
    )
        .into_response()
}

/// POST /transcribe
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>> {
    let upload = extract_upload(multipart).await?;
    let temp = TempUpload::create(&state.config.upload_dir, &upload.filename, &upload.bytes).await?;

    let transcription = state.recognizer.transcribe(temp.path()).await?;

    Ok(Json(TranscriptionResponse {
        transcription,
        duration: None,
    }))
}

/// POST /translate
pub async fn translate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranslationResponse>> {
    let upload = extract_upload(multipart).await?;
    let temp = TempUpload::create(&state.config.upload_dir, &upload.filename, &upload.bytes).await?;

    let translation = state.recognizer.translate(temp.path()).await?;

    Ok(Json(TranslationResponse { translation }))
}

/// POST /process
///
/// Transcribe and translate in sequence; aborts on the first failing
/// sub-step, returning no partial result.
pub async fn process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessingResponse>> {
    let upload = extract_upload(multipart).await?;
    let temp = TempUpload::create(&state.config.upload_dir, &upload.filename, &upload.bytes).await?;

    let transcription = state.recognizer.transcribe(temp.path()).await?;
    let translation = state.recognizer.translate(temp.path()).await?;

    Ok(Json(ProcessingResponse {
        transcription,
        translation,
        filename: upload.filename,
    }))
}

/// POST /stream-transcribe
pub async fn stream_transcribe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>> {
    let upload = extract_upload(multipart).await?;
    let temp = TempUpload::create(&state.config.upload_dir, &upload.filename, &upload.bytes).await?;

    let transcription = state.recognizer.stream_transcribe(temp.path()).await?;

    Ok(Json(TranscriptionResponse {
        transcription,
        duration: None,
    }))
}

/// GET /play/:filename
pub async fn play(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>> {
    let path = resolve_stored_file(&state.config.upload_dir, &filename)?;

    // Device I/O blocks until playback finishes.
    tokio::task::spawn_blocking(move || audio::play(path))
        .await
        .map_err(|e| Error::Internal(format!("playback task panicked: {e}")))??;

    Ok(Json(MessageResponse {
        message: "Audio playback completed".to_string(),
    }))
}

/// GET /download/:filename
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let path = resolve_stored_file(&state.config.upload_dir, &filename)?;
    let bytes = tokio::fs::read(&path).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("Welcome to {}", state.config.app_name),
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/v1/health",
    }))
}
