use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::classify::MessageKind;
use super::types::{DecodeFailure, Message};

pub type MessageCallback = Box<dyn Fn(Message) + Send + Sync>;
pub type DecodeErrorCallback = Box<dyn Fn(DecodeFailure) + Send + Sync>;

/// The three role-specific message sinks, plus an optional sink for
/// payloads that fail to decode.
///
/// Sinks run synchronously on the task driving the stream, so a sink that
/// blocks stalls every later event on that connection.
pub struct Sinks {
    on_request: MessageCallback,
    on_response: MessageCallback,
    on_notification: MessageCallback,
    on_decode_error: Option<DecodeErrorCallback>,
}

impl Sinks {
    pub fn new<Q, R, N>(on_request: Q, on_response: R, on_notification: N) -> Self
    where
        Q: Fn(Message) + Send + Sync + 'static,
        R: Fn(Message) + Send + Sync + 'static,
        N: Fn(Message) + Send + Sync + 'static,
    {
        Self {
            on_request: Box::new(on_request),
            on_response: Box::new(on_response),
            on_notification: Box::new(on_notification),
            on_decode_error: None,
        }
    }

    pub fn on_decode_error<E>(mut self, on_decode_error: E) -> Self
    where
        E: Fn(DecodeFailure) + Send + Sync + 'static,
    {
        self.on_decode_error = Some(Box::new(on_decode_error));
        self
    }

    /// Sinks that forward into unbounded channels, one per role.
    pub fn channels() -> (Self, MessageChannels) {
        let (req_tx, requests) = mpsc::unbounded_channel();
        let (resp_tx, responses) = mpsc::unbounded_channel();
        let (notif_tx, notifications) = mpsc::unbounded_channel();
        let (err_tx, decode_errors) = mpsc::unbounded_channel();

        // A closed receiver means the caller stopped listening; drop quietly.
        let sinks = Sinks::new(
            move |msg| {
                let _ = req_tx.send(msg);
            },
            move |msg| {
                let _ = resp_tx.send(msg);
            },
            move |msg| {
                let _ = notif_tx.send(msg);
            },
        )
        .on_decode_error(move |failure| {
            let _ = err_tx.send(failure);
        });

        (
            sinks,
            MessageChannels {
                requests,
                responses,
                notifications,
                decode_errors,
            },
        )
    }

    pub(crate) fn dispatch(&self, kind: MessageKind, message: Message) {
        match kind {
            MessageKind::Request => (self.on_request)(message),
            MessageKind::Response => (self.on_response)(message),
            MessageKind::Notification => (self.on_notification)(message),
        }
    }

    pub(crate) fn report(&self, failure: DecodeFailure) {
        if let Some(on_decode_error) = &self.on_decode_error {
            on_decode_error(failure);
        }
    }
}

/// Receiving ends of [`Sinks::channels`].
pub struct MessageChannels {
    pub requests: UnboundedReceiver<Message>,
    pub responses: UnboundedReceiver<Message>,
    pub notifications: UnboundedReceiver<Message>,
    pub decode_errors: UnboundedReceiver<DecodeFailure>,
}
