//! SSE transport: opens the HTTP stream and frames it into events.
//!
//! [`SseTransport`] is the seam between the stream client and the network.
//! [`ReqwestTransport`] is the production implementation; tests substitute
//! in-memory transports.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use tracing::debug;

use super::sse::SseDecoder;
use super::types::{Handshake, SseEvent};
use crate::error::{McpSseError, Result};

/// Events of one connection. An `Err` item ends the connection.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SseEvent>> + Send>>;

const EVENT_STREAM: &str = "text/event-stream";
const STREAMABLE_ACCEPT: &str = "application/json, text/event-stream";
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

/// What to open: endpoint, connection headers and an optional POST body.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub method: RequestMethod,
    pub endpoint: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl StreamRequest {
    pub fn get(endpoint: Url, headers: HeaderMap) -> Self {
        Self {
            method: RequestMethod::Get,
            endpoint,
            headers,
            body: None,
        }
    }

    pub fn post(endpoint: Url, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Post,
            endpoint,
            headers,
            body: Some(body.into()),
        }
    }
}

/// An open stream: the handshake metadata plus the events that follow it.
pub struct SseConnection {
    pub handshake: Handshake,
    pub events: EventStream,
}

impl SseConnection {
    pub fn new(handshake: Handshake, events: EventStream) -> Self {
        Self { handshake, events }
    }
}

#[async_trait]
pub trait SseTransport: Send + Sync {
    async fn open(&self, request: &StreamRequest) -> Result<SseConnection>;
}

#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    /// Longest gap between two chunks before the stream is abandoned.
    pub idle_timeout: Option<Duration>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            idle_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    idle_timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_options(TransportOptions::default())
    }

    pub fn with_options(options: TransportOptions) -> Result<Self> {
        // No overall request timeout: the stream is expected to stay open.
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            idle_timeout: options.idle_timeout,
        })
    }

    /// Use a preconfigured client (proxy, TLS roots, default headers) as is.
    /// No idle timeout is applied.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            idle_timeout: None,
        }
    }

    fn request_headers(request: &StreamRequest) -> HeaderMap {
        let mut headers = request.headers.clone();
        match request.method {
            RequestMethod::Get => {
                if !headers.contains_key(ACCEPT) {
                    headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));
                }
            }
            RequestMethod::Post => {
                if !headers.contains_key(ACCEPT) {
                    headers.insert(ACCEPT, HeaderValue::from_static(STREAMABLE_ACCEPT));
                }
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
            }
        }
        headers
    }
}

#[async_trait]
impl SseTransport for ReqwestTransport {
    async fn open(&self, request: &StreamRequest) -> Result<SseConnection> {
        let builder = match request.method {
            RequestMethod::Get => self.client.get(request.endpoint.clone()),
            RequestMethod::Post => self.client.post(request.endpoint.clone()),
        };
        let mut builder = builder.headers(Self::request_headers(request));
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpSseError::HttpStatus {
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let handshake = Handshake::new(status.as_u16(), response.headers().clone());
        let content_type = handshake.header(CONTENT_TYPE.as_str()).unwrap_or("");
        debug!(status = status.as_u16(), content_type, "stream response received");

        // Streamable HTTP servers may answer a POST with a plain JSON body.
        if is_json_media_type(content_type) {
            let body = response.text().await?;
            let events: EventStream = if body.trim().is_empty() {
                Box::pin(stream::empty())
            } else {
                Box::pin(stream::once(async move { Ok(SseEvent::message(body)) }))
            };
            return Ok(SseConnection::new(handshake, events));
        }

        let events = decode_stream(response.bytes_stream(), self.idle_timeout);
        Ok(SseConnection::new(handshake, events))
    }
}

struct DecodeState<E> {
    bytes: Pin<Box<dyn Stream<Item = std::result::Result<Bytes, E>> + Send>>,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    idle_timeout: Option<Duration>,
    finished: bool,
}

/// Frame a byte stream into events. Every event decoded before a read error
/// is yielded ahead of that error.
pub fn decode_stream<S, E>(bytes: S, idle_timeout: Option<Duration>) -> EventStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<McpSseError> + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        idle_timeout,
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }
            if state.finished {
                return None;
            }

            let next = match state.idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, state.bytes.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        state.finished = true;
                        return Some((Err(McpSseError::Timeout), state));
                    }
                },
                None => state.bytes.next().await,
            };

            match next {
                Some(Ok(chunk)) => {
                    let events = state.decoder.feed(&chunk);
                    state.pending.extend(events);
                }
                Some(Err(err)) => {
                    state.finished = true;
                    return Some((Err(err.into()), state));
                }
                None => {
                    state.decoder.finish();
                    state.finished = true;
                }
            }
        }
    }))
}

/// Media types are case-insensitive and may carry parameters such as
/// `charset`.
fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case("application/json"))
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "\u{e9}\u{e9}\u{e9}";
        assert_eq!(truncate(text, 3), "\u{e9}...");
        assert_eq!(truncate("short", 512), "short");
    }

    #[test]
    fn test_json_media_type_ignores_case_and_parameters() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("Application/JSON; charset=utf-8"));
        assert!(is_json_media_type("  application/json ;charset=UTF-8"));
        assert!(!is_json_media_type("text/event-stream"));
        assert!(!is_json_media_type("application/json-seq"));
        assert!(!is_json_media_type(""));
    }

    #[test]
    fn test_get_defaults_accept_to_event_stream() {
        let request = StreamRequest::get(Url::parse("http://localhost/mcp").unwrap(), HeaderMap::new());
        let headers = ReqwestTransport::request_headers(&request);
        assert_eq!(headers.get(ACCEPT).unwrap(), EVENT_STREAM);
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_caller_accept_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream; q=1"));
        let request = StreamRequest::post(Url::parse("http://localhost/mcp").unwrap(), headers, "{}");
        let headers = ReqwestTransport::request_headers(&request);
        assert_eq!(headers.get(ACCEPT).unwrap(), "text/event-stream; q=1");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }
}
