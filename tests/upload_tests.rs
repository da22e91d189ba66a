// Tests for upload validation and the temp-file lifecycle.

use anyhow::Result;
use tempfile::TempDir;
use voicebridge::{validate_upload, Error, TempUpload};

#[test]
fn test_wav_extension_without_content_type_is_accepted() {
    assert!(validate_upload(Some("foo.wav"), None).is_ok());
}

#[test]
fn test_txt_extension_is_rejected() {
    let err = validate_upload(Some("foo.txt"), None).unwrap_err();
    assert!(matches!(err, Error::InvalidFileType));
}

#[test]
fn test_audio_content_type_without_extension_is_accepted() {
    assert!(validate_upload(Some("foo"), Some("audio/mpeg")).is_ok());
}

#[test]
fn test_no_filename_no_content_type_is_rejected() {
    assert!(matches!(
        validate_upload(None, None),
        Err(Error::InvalidFileType)
    ));
}

#[test]
fn test_extension_check_is_case_insensitive() {
    assert!(validate_upload(Some("FOO.WAV"), None).is_ok());
    assert!(validate_upload(Some("Speech.Mp3"), None).is_ok());
}

#[test]
fn test_non_audio_content_type_falls_back_to_extension() {
    // Browsers sometimes send application/octet-stream for audio files.
    assert!(validate_upload(Some("foo.flac"), Some("application/octet-stream")).is_ok());
    assert!(matches!(
        validate_upload(Some("foo.pdf"), Some("application/pdf")),
        Err(Error::InvalidFileType)
    ));
}

#[tokio::test]
async fn test_same_filename_gets_distinct_temp_paths() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap();

    let a = TempUpload::create(dir, "clip.wav", b"first").await?;
    let b = TempUpload::create(dir, "clip.wav", b"second").await?;

    assert_ne!(a.path(), b.path(), "concurrent uploads must not collide");
    assert_eq!(std::fs::read(a.path())?, b"first");
    assert_eq!(std::fs::read(b.path())?, b"second");

    Ok(())
}

#[tokio::test]
async fn test_temp_upload_is_removed_on_drop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap();

    let upload = TempUpload::create(dir, "clip.wav", b"bytes").await?;
    let path = upload.path().to_path_buf();
    assert!(path.exists());

    drop(upload);
    assert!(!path.exists(), "temp file should be removed on drop");

    Ok(())
}

#[tokio::test]
async fn test_temp_upload_strips_path_components() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap();

    let upload = TempUpload::create(dir, "../../etc/passwd", b"x").await?;
    assert!(
        upload.path().starts_with(temp_dir.path()),
        "upload must stay inside the upload dir, got {:?}",
        upload.path()
    );

    Ok(())
}

#[tokio::test]
async fn test_temp_upload_filenames_carry_prefix() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap();

    let upload = TempUpload::create(dir, "clip.wav", b"x").await?;
    let name = upload.path().file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("temp_"), "got {name}");
    assert!(name.ends_with("clip.wav"), "got {name}");

    Ok(())
}
