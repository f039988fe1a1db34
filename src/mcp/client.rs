use std::sync::Arc;

use futures::StreamExt;
use once_cell::sync::OnceCell;
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde_json::Value;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::classify::{classify, MessageKind};
use super::sinks::Sinks;
use super::transport_sse::{ReqwestTransport, SseConnection, SseTransport, StreamRequest};
use super::types::{DecodeFailure, Handshake, Message, SseEvent, StreamSummary};
use crate::error::{McpSseError, Result};

/// Write-once slot for the handshake of the first successful connection.
///
/// Cloning shares the slot, so a clone can be read (or awaited) while the
/// stream runs.
#[derive(Debug, Clone, Default)]
pub struct HeaderSlot(Arc<SlotInner>);

#[derive(Debug, Default)]
struct SlotInner {
    handshake: OnceCell<Handshake>,
    published: Notify,
}

impl HeaderSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the handshake has completed.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.0.handshake.get().map(|handshake| &handshake.headers)
    }

    pub fn handshake(&self) -> Option<&Handshake> {
        self.0.handshake.get()
    }

    pub fn is_available(&self) -> bool {
        self.0.handshake.get().is_some()
    }

    /// Resolves with the handshake once it is published. Never resolves if
    /// no connection succeeds.
    pub async fn wait(&self) -> &Handshake {
        loop {
            // Register before checking so a publish in between is not missed.
            let published = self.0.published.notified();
            if let Some(handshake) = self.0.handshake.get() {
                return handshake;
            }
            published.await;
        }
    }

    /// Returns false if the slot was already filled; the first value stays.
    pub fn publish(&self, handshake: Handshake) -> bool {
        let stored = self.0.handshake.set(handshake).is_ok();
        if stored {
            self.0.published.notify_waiters();
        }
        stored
    }
}

/// Streams JSON-RPC messages from one MCP SSE endpoint into role-specific
/// sinks.
pub struct StreamClient {
    endpoint: Url,
    headers: HeaderMap,
    sinks: Sinks,
    transport: Arc<dyn SseTransport>,
    response_headers: HeaderSlot,
}

impl StreamClient {
    /// Client over the default reqwest transport.
    pub fn new(endpoint: Url, headers: HeaderMap, sinks: Sinks) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(
            endpoint,
            headers,
            sinks,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        endpoint: Url,
        headers: HeaderMap,
        sinks: Sinks,
        transport: Arc<dyn SseTransport>,
    ) -> Self {
        Self {
            endpoint,
            headers,
            sinks,
            transport,
            response_headers: HeaderSlot::new(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Open the event stream (GET) and dispatch until it ends.
    ///
    /// Returns the per-role counters on a clean end of stream. Connection
    /// failures, including one that happens mid-stream, are returned as
    /// errors after every event received before them was dispatched.
    pub async fn connect(&self) -> Result<StreamSummary> {
        let request = StreamRequest::get(self.endpoint.clone(), self.headers.clone());
        self.run(request).await
    }

    /// POST `body` and dispatch the streamed (or plain JSON) response.
    pub async fn send(&self, body: impl Into<String>) -> Result<StreamSummary> {
        let request = StreamRequest::post(self.endpoint.clone(), self.headers.clone(), body);
        self.run(request).await
    }

    /// Run [`connect`](Self::connect) on a tokio task. Aborting the task
    /// closes the connection.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<Result<StreamSummary>> {
        tokio::spawn(async move { self.connect().await })
    }

    /// Headers of the first handshake, `None` before it completes.
    pub fn response_headers(&self) -> Option<&HeaderMap> {
        self.response_headers.headers()
    }

    pub fn header_slot(&self) -> HeaderSlot {
        self.response_headers.clone()
    }

    async fn run(&self, request: StreamRequest) -> Result<StreamSummary> {
        debug!(endpoint = %request.endpoint, method = ?request.method, "opening event stream");

        let SseConnection {
            handshake,
            mut events,
        } = self.transport.open(&request).await?;

        info!(status = handshake.status, endpoint = %request.endpoint, "event stream open");
        if !self.response_headers.publish(handshake) {
            debug!("response headers already captured, keeping the first set");
        }

        let mut summary = StreamSummary::default();
        while let Some(event) = events.next().await {
            let event = event?;
            self.handle_event(event, &mut summary);
        }

        info!(
            dispatched = summary.dispatched(),
            decode_errors = summary.decode_errors,
            ignored = summary.ignored,
            "event stream ended"
        );
        Ok(summary)
    }

    fn handle_event(&self, event: SseEvent, summary: &mut StreamSummary) {
        if !event.is_message() {
            debug!(name = %event.name, "ignoring non-message event");
            summary.ignored += 1;
            return;
        }

        match decode_message(&event.data) {
            Ok(message) => {
                let kind = classify(&message);
                debug!(%kind, event_id = ?event.id, "dispatching message");
                match kind {
                    MessageKind::Request => summary.requests += 1,
                    MessageKind::Response => summary.responses += 1,
                    MessageKind::Notification => summary.notifications += 1,
                }
                self.sinks.dispatch(kind, message);
            }
            Err(err) => {
                warn!(error = %err, event_id = ?event.id, "skipping undecodable message event");
                summary.decode_errors += 1;
                self.sinks.report(DecodeFailure {
                    event_id: event.id,
                    data: event.data,
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Parse one `message` payload. Only JSON objects are messages.
pub fn decode_message(data: &str) -> Result<Message> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(message)) => Ok(message),
        Ok(_) => Err(McpSseError::NotAnObject {
            data: data.to_string(),
        }),
        Err(source) => Err(McpSseError::Decode {
            data: data.to_string(),
            source,
        }),
    }
}
