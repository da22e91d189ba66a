use std::sync::Arc;

use crate::config::Config;
use crate::recognition::Recognizer;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recognizer: Arc<dyn Recognizer>,
}

impl AppState {
    pub fn new(config: Arc<Config>, recognizer: Arc<dyn Recognizer>) -> Self {
        Self { config, recognizer }
    }
}
