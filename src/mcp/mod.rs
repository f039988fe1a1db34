pub mod classify;
pub mod client;
pub mod sinks;
pub mod sse;
pub mod transport_sse;
pub mod types;

pub use classify::{classify, MessageKind};
pub use client::{decode_message, HeaderSlot, StreamClient};
pub use sinks::{MessageChannels, Sinks};
pub use sse::SseDecoder;
pub use transport_sse::{
    decode_stream, EventStream, ReqwestTransport, RequestMethod, SseConnection, SseTransport,
    StreamRequest, TransportOptions,
};
pub use types::{DecodeFailure, Handshake, Message, SseEvent, StreamSummary, MESSAGE_EVENT};
