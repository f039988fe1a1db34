//! Incremental Server-Sent Events decoder.
//!
//! Bytes arrive in arbitrary chunks; the decoder buffers partial lines (and
//! partial UTF-8 sequences) and emits an [`SseEvent`] for every blank-line
//! terminated frame that carried at least one `data:` line.
//!
//! Field handling follows the EventSource processing model:
//! - `event: <name>` names the frame, default `message`
//! - `data: <text>` appends a line, multiple lines are joined with `\n`
//! - `id: <id>` sets the last event id (kept across frames)
//! - `retry: <ms>` records a reconnection hint, digits only
//! - lines starting with `:` are comments
//! - `\n`, `\r\n` and lone `\r` all end a line

use super::types::{SseEvent, MESSAGE_EVENT};

const BOM: char = '\u{feff}';

#[derive(Debug, Default)]
pub struct SseDecoder {
    line: String,
    utf8_tail: Vec<u8>,
    after_cr: bool,
    started: bool,
    event_name: Option<String>,
    data: String,
    last_event_id: Option<String>,
    retry: Option<u64>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by this chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut bytes = std::mem::take(&mut self.utf8_tail);
        bytes.extend_from_slice(chunk);

        let mut text = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    // Validated just above.
                    text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            // Sequence cut by the chunk boundary.
                            self.utf8_tail = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        self.feed_str(&text)
    }

    /// Feed already-decoded text.
    pub fn feed_str(&mut self, text: &str) -> Vec<SseEvent> {
        let mut events = Vec::new();

        for ch in text.chars() {
            if !self.started {
                self.started = true;
                if ch == BOM {
                    continue;
                }
            }

            if self.after_cr {
                self.after_cr = false;
                if ch == '\n' {
                    continue;
                }
            }

            match ch {
                '\r' => {
                    self.after_cr = true;
                    self.end_line(&mut events);
                }
                '\n' => self.end_line(&mut events),
                c => self.line.push(c),
            }
        }

        events
    }

    /// End of stream. An unterminated trailing frame is discarded.
    pub fn finish(&mut self) {
        self.line.clear();
        self.utf8_tail.clear();
        self.event_name = None;
        self.data.clear();
        self.after_cr = false;
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    fn end_line(&mut self, events: &mut Vec<SseEvent>) {
        let line = std::mem::take(&mut self.line);

        if line.is_empty() {
            if let Some(event) = self.dispatch() {
                events.push(event);
            }
            return;
        }

        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line.as_str(), ""),
        };

        match field {
            "event" => self.event_name = Some(value.to_string()),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(ms) = value.parse::<u64>() {
                        self.retry = Some(ms);
                    }
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let name = self.event_name.take();
        if self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        data.pop();

        Some(SseEvent {
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| MESSAGE_EVENT.to_string()),
            data,
            id: self.last_event_id.clone(),
            retry: self.retry.take(),
        })
    }
}
