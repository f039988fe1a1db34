use colored::*;
use reqwest::header::HeaderMap;
use serde_json::Value;

use super::highlight::JsonHighlighter;
use crate::mcp::{DecodeFailure, Handshake, Message, MessageKind, StreamSummary};

/// One-line description of a message: its role plus `id` and/or `method`.
pub fn describe_message(kind: MessageKind, message: &Message) -> String {
    let mut parts = vec![kind.as_str().to_string()];
    if let Some(id) = message.get("id") {
        parts.push(format!("id={}", compact(id)));
    }
    if let Some(method) = message.get("method").and_then(Value::as_str) {
        parts.push(format!("method={}", method));
    }
    if message.contains_key("error") {
        parts.push("(error)".to_string());
    }
    parts.join(" ")
}

/// Headers as `name: value` lines, in map order.
pub fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            format!(
                "{}: {}",
                name,
                value.to_str().unwrap_or("<non-ascii value>")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

fn colored_kind(kind: MessageKind, text: String) -> ColoredString {
    match kind {
        MessageKind::Request => text.yellow().bold(),
        MessageKind::Response => text.green().bold(),
        MessageKind::Notification => text.cyan().bold(),
    }
}

/// Prints classified messages, pretty-printed and highlighted in verbose
/// mode, compact otherwise.
pub struct MessagePrinter {
    pretty: bool,
    highlighter: Option<JsonHighlighter>,
}

impl MessagePrinter {
    pub fn new(pretty: bool) -> Self {
        let highlighter = if pretty && colored::control::SHOULD_COLORIZE.should_colorize() {
            Some(JsonHighlighter::new())
        } else {
            None
        };
        Self {
            pretty,
            highlighter,
        }
    }

    pub fn print(&self, kind: MessageKind, message: &Message) {
        let header = colored_kind(kind, describe_message(kind, message));
        println!("{} {}", timestamp().dimmed(), header);

        let body = if self.pretty {
            serde_json::to_string_pretty(message).unwrap_or_default()
        } else {
            serde_json::to_string(message).unwrap_or_default()
        };
        match &self.highlighter {
            Some(highlighter) => println!("{}", highlighter.highlight(&body)),
            None => println!("{}", body),
        }
    }
}

pub fn display_decode_failure(failure: &DecodeFailure) {
    let id = failure
        .event_id
        .as_deref()
        .map(|id| format!(" (event id {})", id))
        .unwrap_or_default();
    eprintln!(
        "{} {}",
        timestamp().dimmed(),
        format!("undecodable message{}: {}", id, failure.reason).red()
    );
    eprintln!("{}", failure.data.dimmed());
}

pub fn display_headers(handshake: &Handshake) {
    println!("{}", format!("HTTP {}", handshake.status).bold());
    let headers = format_headers(&handshake.headers);
    if !headers.is_empty() {
        println!("{}", headers.dimmed());
    }
    println!("{}", "-".repeat(80).dimmed());
}

pub fn display_summary(summary: &StreamSummary) {
    println!("{}", "-".repeat(80).dimmed());
    println!(
        "{}",
        format!(
            "Stream ended: {} requests, {} responses, {} notifications, {} ignored events, {} decode errors",
            summary.requests,
            summary.responses,
            summary.notifications,
            summary.ignored,
            summary.decode_errors
        )
        .green()
    );
}
