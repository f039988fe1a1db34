use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON-RPC message as received from the stream. Key order is preserved.
pub type Message = Map<String, Value>;

/// Event name that carries JSON-RPC payloads.
pub const MESSAGE_EVENT: &str = "message";

/// One framed Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SseEvent {
    pub name: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u64>,
}

impl SseEvent {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            id: None,
            retry: None,
        }
    }

    /// Shorthand for an event named `message`.
    pub fn message(data: impl Into<String>) -> Self {
        Self::new(MESSAGE_EVENT, data)
    }

    pub fn is_message(&self) -> bool {
        self.name == MESSAGE_EVENT
    }
}

/// Response metadata reported once per successful connection.
#[derive(Debug, Clone, Default)]
pub struct Handshake {
    pub status: u16,
    pub headers: HeaderMap,
}

impl Handshake {
    pub fn new(status: u16, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A `message` payload that could not be turned into a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub event_id: Option<String>,
    pub data: String,
    pub reason: String,
}

/// Counters for one stream, returned when it ends cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub requests: usize,
    pub responses: usize,
    pub notifications: usize,
    pub ignored: usize,
    pub decode_errors: usize,
}

impl StreamSummary {
    pub fn dispatched(&self) -> usize {
        self.requests + self.responses + self.notifications
    }
}
