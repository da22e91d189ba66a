//! HTTP API for the recognition pass-through.
//!
//! - GET  /api/v1/health            - health check
//! - POST /api/v1/record            - incomplete (501), see handler
//! - POST /api/v1/transcribe        - multipart upload, batch transcription
//! - POST /api/v1/translate         - multipart upload, translation to English
//! - POST /api/v1/process           - transcription + translation
//! - POST /api/v1/stream-transcribe - multipart upload, streaming transcription
//! - GET  /api/v1/play/:filename    - play a stored file on the server device
//! - GET  /api/v1/download/:filename - download a stored file

mod handlers;
mod routes;
mod state;
mod upload;

pub use routes::create_router;
pub use state::AppState;
pub use upload::{validate_upload, TempUpload};
