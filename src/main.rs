use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use voicebridge::{create_router, AppState, Config, RecognitionClient};

#[derive(Debug, Parser)]
#[command(name = "voicebridge", about = "Audio transcription and translation API")]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Arc::new(Config::load()?);

    info!("{} v{}", config.app_name, env!("CARGO_PKG_VERSION"));
    info!("Upload directory: {}", config.upload_dir);

    let recognizer = Arc::new(RecognitionClient::new(&config)?);
    let state = AppState::new(config, recognizer);
    let router = create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
