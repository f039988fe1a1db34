use std::fmt;

use super::types::Message;

/// Role of a JSON-RPC message, decided by which of `id`, `result` and
/// `error` are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Request,
    Response,
    Notification,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
            MessageKind::Notification => "notification",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a message by key presence only. A `null` value still counts as
/// present. `id` with both `result` and `error` is a `Response`.
pub fn classify(message: &Message) -> MessageKind {
    if !message.contains_key("id") {
        MessageKind::Notification
    } else if message.contains_key("result") || message.contains_key("error") {
        MessageKind::Response
    } else {
        MessageKind::Request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn obj(value: Value) -> Message {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn null_id_is_still_an_id() {
        let msg = obj(json!({"id": null, "method": "tools/list"}));
        assert_eq!(classify(&msg), MessageKind::Request);
    }

    #[test]
    fn null_result_is_still_a_response() {
        let msg = obj(json!({"id": 3, "result": null}));
        assert_eq!(classify(&msg), MessageKind::Response);
    }

    #[test]
    fn display_uses_lowercase_names() {
        assert_eq!(MessageKind::Notification.to_string(), "notification");
    }
}
