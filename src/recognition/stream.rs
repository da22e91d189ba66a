use serde::Deserialize;

/// One event from a streaming transcription.
///
/// Accumulation is defined purely by the tag: a delta appends, a snapshot
/// replaces whatever has been accumulated so far. No substring heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Incremental fragment to append.
    Delta(String),
    /// Full replacement of the text so far.
    Snapshot(String),
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl TranscriptEvent {
    /// Parse one SSE data payload. Unknown event types yield `None`.
    pub fn parse(payload: &str) -> Option<Self> {
        let raw: RawEvent = serde_json::from_str(payload).ok()?;
        match raw.kind.as_str() {
            "transcript.text.delta" => raw.delta.map(TranscriptEvent::Delta),
            "transcript.text.done" => raw.text.map(TranscriptEvent::Snapshot),
            _ => None,
        }
    }
}

/// Accumulates streaming transcription events into the final text.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    text: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event; returns the fragment that became newly visible,
    /// for interactive echo.
    pub fn apply(&mut self, event: TranscriptEvent) -> Option<String> {
        match event {
            TranscriptEvent::Delta(fragment) => {
                self.text.push_str(&fragment);
                Some(fragment)
            }
            TranscriptEvent::Snapshot(full) => {
                if full == self.text {
                    return None;
                }
                self.text = full;
                None
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Incremental parser for server-sent-event byte streams.
///
/// Feed it raw network chunks as they arrive; it reassembles lines across
/// chunk boundaries and yields the payload of each `data:` record. Chunks
/// are buffered as bytes and decoded one complete line at a time, so a
/// multi-byte UTF-8 character split across chunks survives intact. The
/// `[DONE]` sentinel ends the stream.
#[derive(Debug, Default)]
pub struct SseParser {
    pending: Vec<u8>,
    finished: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut payloads = Vec::new();
        if self.finished {
            return payloads;
        }

        self.pending.extend_from_slice(chunk);

        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if let Some(payload) = self.extract_data(&line) {
                payloads.push(payload);
            }
            if self.finished {
                break;
            }
        }

        payloads
    }

    /// Flush a final `data:` record that arrived without a trailing
    /// newline. Call once at stream end.
    pub fn finish(&mut self) -> Option<String> {
        if self.finished || self.pending.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.pending);
        self.extract_data(&line)
    }

    fn extract_data(&mut self, line: &[u8]) -> Option<String> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\n', '\r']);

        let data = line.strip_prefix("data:")?.trim_start();

        if data == "[DONE]" {
            self.finished = true;
            return None;
        }
        if data.is_empty() {
            return None;
        }
        Some(data.to_string())
    }
}
