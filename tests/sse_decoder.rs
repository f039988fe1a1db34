use bytes::Bytes;
use futures::{stream, StreamExt};
use mcp_sse_probe::mcp::{decode_stream, SseDecoder, SseEvent};
use mcp_sse_probe::McpSseError;
use std::io;
use std::time::Duration;

const STREAM: &str = ": keep-alive\r\n\
event: endpoint\r\n\
data: /mcp/messages?sessionId=42\r\n\
\r\n\
retry: 3000\n\
id: 1\n\
event: message\n\
data: {\"jsonrpc\":\"2.0\",\"id\":1,\n\
data: \"result\":{\"tools\":[]}}\n\
\n\
data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/message\",\"params\":{\"data\":\"h\u{e9}llo\"}}\r\r\
event: message\n\
data: {\"id\":2}\n\n";

fn expected() -> Vec<SseEvent> {
    vec![
        SseEvent::new("endpoint", "/mcp/messages?sessionId=42"),
        SseEvent {
            name: "message".to_string(),
            data: "{\"jsonrpc\":\"2.0\",\"id\":1,\n\"result\":{\"tools\":[]}}".to_string(),
            id: Some("1".to_string()),
            retry: Some(3000),
        },
        SseEvent {
            name: "message".to_string(),
            data: "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/message\",\"params\":{\"data\":\"h\u{e9}llo\"}}"
                .to_string(),
            id: Some("1".to_string()),
            retry: None,
        },
        SseEvent {
            name: "message".to_string(),
            data: "{\"id\":2}".to_string(),
            id: Some("1".to_string()),
            retry: None,
        },
    ]
}

fn decode_in_chunks(bytes: &[u8], chunk_size: usize) -> Vec<SseEvent> {
    let mut decoder = SseDecoder::new();
    let mut events = Vec::new();
    for chunk in bytes.chunks(chunk_size) {
        events.extend(decoder.feed(chunk));
    }
    decoder.finish();
    events
}

#[test]
fn test_whole_stream_decodes() {
    assert_eq!(decode_in_chunks(STREAM.as_bytes(), STREAM.len()), expected());
}

#[test]
fn test_chunking_does_not_change_events() {
    let bytes = STREAM.as_bytes();
    for chunk_size in 1..=17 {
        assert_eq!(
            decode_in_chunks(bytes, chunk_size),
            expected(),
            "chunk size {}",
            chunk_size
        );
    }
}

#[test]
fn test_every_two_way_split_gives_same_events() {
    let bytes = STREAM.as_bytes();
    for split in 0..=bytes.len() {
        let mut decoder = SseDecoder::new();
        let mut events = decoder.feed(&bytes[..split]);
        events.extend(decoder.feed(&bytes[split..]));
        assert_eq!(events, expected(), "split at {}", split);
    }
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"data: a\xffb\n\n");
    assert_eq!(events[0].data, "a\u{fffd}b");
}

#[tokio::test]
async fn test_decode_stream_yields_events_in_order() {
    let chunks: Vec<Result<Bytes, io::Error>> = STREAM
        .as_bytes()
        .chunks(5)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();

    let events: Vec<SseEvent> = decode_stream(stream::iter(chunks), None)
        .map(|event| event.unwrap())
        .collect()
        .await;

    assert_eq!(events, expected());
}

#[tokio::test]
async fn test_decode_stream_error_follows_earlier_events() {
    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from_static(b"data: {\"id\":1}\n\ndata: {\"id\"")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        Ok(Bytes::from_static(b":2}\n\n")),
    ];

    let mut events = decode_stream(stream::iter(chunks), None);

    assert_eq!(
        events.next().await.unwrap().unwrap(),
        SseEvent::message("{\"id\":1}")
    );
    assert!(matches!(
        events.next().await.unwrap(),
        Err(McpSseError::IoError(_))
    ));
    assert!(events.next().await.is_none());
}

#[tokio::test]
async fn test_decode_stream_idle_timeout() {
    let first: Vec<Result<Bytes, io::Error>> = vec![Ok(Bytes::from_static(b"data: {}\n\n"))];
    let bytes = stream::iter(first).chain(stream::pending());

    let mut events = decode_stream(bytes, Some(Duration::from_millis(50)));

    assert_eq!(events.next().await.unwrap().unwrap(), SseEvent::message("{}"));
    assert!(matches!(
        events.next().await.unwrap(),
        Err(McpSseError::Timeout)
    ));
    assert!(events.next().await.is_none());
}

#[tokio::test]
async fn test_decode_stream_drops_unterminated_tail() {
    let chunks: Vec<Result<Bytes, io::Error>> =
        vec![Ok(Bytes::from_static(b"data: {\"id\":1}\n\ndata: {\"id\":2}\n"))];

    let events: Vec<_> = decode_stream(stream::iter(chunks), None).collect().await;

    assert_eq!(events.len(), 1);
}
