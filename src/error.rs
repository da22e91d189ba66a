use thiserror::Error;

/// Error taxonomy for the audio pipeline and HTTP surface.
///
/// Validation failures map to 400, missing files to 404 and everything
/// else to 500 in the HTTP layer; no error is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file must be an audio file")]
    InvalidFileType,

    #[error("no audio data recorded")]
    EmptyRecording,

    #[error("audio file not found: {0}")]
    NotFound(String),

    #[error("unsupported sample format: {bits} bits per sample")]
    UnsupportedFormat { bits: u16 },

    #[error("recognition request failed: {0}")]
    Recognition(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wav(#[from] hound::Error),

    #[error("{0}")]
    Internal(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Transport and service errors are wrapped opaquely; the HTTP
        // layer reports the message verbatim.
        Error::Recognition(err.to_string())
    }
}

impl Error {
    /// Short category label used in error response bodies.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidFileType => "invalid_file_type",
            Error::EmptyRecording => "empty_recording",
            Error::NotFound(_) => "not_found",
            Error::UnsupportedFormat { .. } => "unsupported_format",
            Error::Recognition(_) => "recognition_failed",
            Error::Io(_) | Error::Wav(_) | Error::Internal(_) => "internal_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
