use mcp_sse_probe::mcp::{Message, MessageKind};
use mcp_sse_probe::ui::{describe_message, format_headers, JsonHighlighter};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;

fn message(value: serde_json::Value) -> Message {
    value.as_object().unwrap().clone()
}

#[test]
fn test_describe_request() {
    let msg = message(json!({"jsonrpc": "2.0", "id": "abc", "method": "sampling/createMessage"}));
    assert_eq!(
        describe_message(MessageKind::Request, &msg),
        "request id=\"abc\" method=sampling/createMessage"
    );
}

#[test]
fn test_describe_error_response() {
    let msg = message(json!({"jsonrpc": "2.0", "id": 3, "error": {"code": -32601, "message": "nope"}}));
    assert_eq!(
        describe_message(MessageKind::Response, &msg),
        "response id=3 (error)"
    );
}

#[test]
fn test_describe_notification() {
    let msg = message(json!({"jsonrpc": "2.0", "method": "notifications/progress"}));
    assert_eq!(
        describe_message(MessageKind::Notification, &msg),
        "notification method=notifications/progress"
    );
}

#[test]
fn test_format_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("text/event-stream"));
    headers.insert("mcp-session-id", HeaderValue::from_static("s-1"));

    assert_eq!(
        format_headers(&headers),
        "content-type: text/event-stream\nmcp-session-id: s-1"
    );
    assert_eq!(format_headers(&HeaderMap::new()), "");
}

#[test]
fn test_highlight_keeps_text() {
    let highlighted = JsonHighlighter::new().highlight("{\"id\": 1}");
    assert!(highlighted.contains("id"));
    assert!(highlighted.contains('1'));
}
