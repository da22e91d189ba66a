//! Sequential voice pipeline: record from the microphone, stream a
//! transcription to the terminal, print a batch transcription and a
//! translation, then play the recording back. No flags.
//!
//! Recording and playback run outside the tokio runtime because cpal
//! streams are not `Send`; only the recognition calls are async.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use voicebridge::{audio, Config, Microphone, RecognitionClient, Recognizer, RecordingSession};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("Voicebridge");
    println!("==============================");

    let config = Config::load()?;
    let client = RecognitionClient::new(&config).context("Failed to build recognition client")?;

    std::fs::create_dir_all(&config.upload_dir)?;
    let output_path = Path::new(&config.upload_dir).join(&config.recording_filename);

    let recording = record(&config, &output_path)?;
    println!(
        "Recording saved as {} ({:.1}s)",
        recording.path, recording.duration
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        println!("\n--- Streaming Transcription ---");
        client.stream_transcribe(&output_path).await?;

        println!("\n--- Transcription ---");
        let transcription = client.transcribe(&output_path).await?;
        println!("Transcription: {transcription}");

        println!("\n--- Translation ---");
        let translation = client.translate(&output_path).await?;
        println!("Translation: {translation}");

        Ok::<_, voicebridge::Error>(())
    })?;

    audio::play(&output_path)?;
    println!("\nProcess completed");

    Ok(())
}

fn record(config: &Config, output_path: &Path) -> Result<voicebridge::Recording> {
    println!("Press Enter to start recording...");
    wait_for_enter()?;

    let session = Arc::new(RecordingSession::new(config.sample_rate, config.channels));
    let microphone = Microphone::start(Arc::clone(&session))?;
    session.arm();

    println!("Recording... Press Enter to stop.");
    wait_for_enter()?;

    let recording = session.stop(output_path)?;
    drop(microphone);

    Ok(recording)
}

fn wait_for_enter() -> Result<()> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
