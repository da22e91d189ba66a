// Router tests with a canned recognizer standing in for the external
// speech-recognition service.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;
use voicebridge::{create_router, AppState, Config, Recognizer};

const BOUNDARY: &str = "----voicebridge-test-boundary";

/// Recognizer returning fixed strings; asserts the temp upload exists at
/// call time.
struct FixedRecognizer;

#[async_trait]
impl Recognizer for FixedRecognizer {
    async fn transcribe(&self, path: &Path) -> voicebridge::Result<String> {
        assert!(path.exists(), "temp upload should exist during recognition");
        Ok("[BLANK_AUDIO]".to_string())
    }

    async fn translate(&self, path: &Path) -> voicebridge::Result<String> {
        assert!(path.exists(), "temp upload should exist during recognition");
        Ok("translated text".to_string())
    }

    async fn stream_transcribe(&self, path: &Path) -> voicebridge::Result<String> {
        assert!(path.exists(), "temp upload should exist during recognition");
        Ok("[BLANK_AUDIO]".to_string())
    }
}

struct FailingRecognizer;

#[async_trait]
impl Recognizer for FailingRecognizer {
    async fn transcribe(&self, _path: &Path) -> voicebridge::Result<String> {
        Err(voicebridge::Error::Recognition(
            "service returned 500 Internal Server Error".to_string(),
        ))
    }

    async fn translate(&self, _path: &Path) -> voicebridge::Result<String> {
        Err(voicebridge::Error::Recognition("unreachable".to_string()))
    }

    async fn stream_transcribe(&self, _path: &Path) -> voicebridge::Result<String> {
        Err(voicebridge::Error::Recognition("unreachable".to_string()))
    }
}

fn test_config(upload_dir: &Path) -> Config {
    Config {
        app_name: "voicebridge".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_api_base: "http://127.0.0.1:0/v1".to_string(),
        model_transcribe: "whisper-1".to_string(),
        model_stream: "gpt-4o-mini-transcribe".to_string(),
        sample_rate: 44100,
        channels: 1,
        recording_filename: "recording.wav".to_string(),
        upload_dir: upload_dir.to_str().unwrap().to_string(),
        max_upload_bytes: 25 * 1024 * 1024,
    }
}

fn test_router(upload_dir: &Path, recognizer: Arc<dyn Recognizer>) -> axum::Router {
    let state = AppState::new(Arc::new(test_config(upload_dir)), recognizer);
    create_router(state)
}

/// Two seconds of 44.1kHz mono 16-bit silence.
fn silence_wav() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..(44100 * 2) {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn multipart_request(
    uri: &str,
    filename: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn leftover_temp_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| name.starts_with("temp_"))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let response = router
        .oneshot(Request::get("/api/v1/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["app_name"], "voicebridge");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_transcribe_silence_wav() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let request = multipart_request(
        "/api/v1/transcribe",
        "silence.wav",
        Some("audio/wav"),
        &silence_wav(),
    );
    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["transcription"], "[BLANK_AUDIO]");

    // Temp upload is cleaned up after the request.
    assert!(leftover_temp_files(dir.path()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_transcribe_rejects_non_audio_upload() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let request = multipart_request("/api/v1/transcribe", "foo.txt", None, b"hello");
    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_file_type");
    assert!(body["detail"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_transcribe_accepts_content_type_without_extension() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let request = multipart_request("/api/v1/transcribe", "foo", Some("audio/mpeg"), b"mp3data");
    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_translate() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let request = multipart_request(
        "/api/v1/translate",
        "speech.wav",
        Some("audio/wav"),
        &silence_wav(),
    );
    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["translation"], "translated text");

    Ok(())
}

#[tokio::test]
async fn test_process_returns_all_fields() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let request = multipart_request(
        "/api/v1/process",
        "meeting.wav",
        Some("audio/wav"),
        &silence_wav(),
    );
    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["transcription"], "[BLANK_AUDIO]");
    assert_eq!(body["translation"], "translated text");
    assert_eq!(body["filename"], "meeting.wav");

    Ok(())
}

#[tokio::test]
async fn test_stream_transcribe() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let request = multipart_request(
        "/api/v1/stream-transcribe",
        "clip.wav",
        Some("audio/wav"),
        &silence_wav(),
    );
    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["transcription"], "[BLANK_AUDIO]");

    Ok(())
}

#[tokio::test]
async fn test_record_endpoint_is_unfinished() -> Result<()> {
    // The record endpoint has no stop signal; it answers 501 instead of
    // starting a capture that could never terminate.
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let response = router
        .oneshot(Request::post("/api/v1/record").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "not_implemented");

    Ok(())
}

#[tokio::test]
async fn test_play_missing_file_is_404() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let response = router
        .oneshot(Request::get("/api/v1/play/missing.wav").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_download_missing_file_is_404() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let response = router
        .oneshot(Request::get("/api/v1/download/missing.wav").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_download_streams_stored_wav() -> Result<()> {
    let dir = TempDir::new()?;
    let wav = silence_wav();
    std::fs::write(dir.path().join("stored.wav"), &wav)?;

    let router = test_router(dir.path(), Arc::new(FixedRecognizer));
    let response = router
        .oneshot(Request::get("/api/v1/download/stored.wav").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str()?,
        "audio/wav"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(bytes.as_ref(), wav.as_slice());

    Ok(())
}

#[tokio::test]
async fn test_concurrent_uploads_with_same_filename() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));
    let wav = silence_wav();

    let first = router.clone().oneshot(multipart_request(
        "/api/v1/transcribe",
        "same.wav",
        Some("audio/wav"),
        &wav,
    ));
    let second = router.clone().oneshot(multipart_request(
        "/api/v1/transcribe",
        "same.wav",
        Some("audio/wav"),
        &wav,
    ));

    let (a, b) = tokio::join!(first, second);
    assert_eq!(a?.status(), StatusCode::OK);
    assert_eq!(b?.status(), StatusCode::OK);
    assert!(leftover_temp_files(dir.path()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_recognition_failure_maps_to_500_and_cleans_up() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FailingRecognizer));

    let request = multipart_request(
        "/api/v1/transcribe",
        "clip.wav",
        Some("audio/wav"),
        &silence_wav(),
    );
    let response = router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "recognition_failed");

    // Temp file must not leak on the failure path.
    assert!(leftover_temp_files(dir.path()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_root_welcome() -> Result<()> {
    let dir = TempDir::new()?;
    let router = test_router(dir.path(), Arc::new(FixedRecognizer));

    let response = router.oneshot(Request::get("/").body(Body::empty())?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["health"], "/api/v1/health");

    Ok(())
}
