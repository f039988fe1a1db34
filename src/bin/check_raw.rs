use colored::*;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::env;

use mcp_sse_probe::config::{merge_headers, parse_endpoint, parse_header_line};
use mcp_sse_probe::mcp::{ReqwestTransport, SseTransport, StreamRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get command line args
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <endpoint> [--post <json-body>] [-H 'Name: value']...",
            args[0]
        );
        std::process::exit(1);
    }

    let endpoint = parse_endpoint(&args[1])?;
    let mut body = None;
    let mut headers = HeaderMap::new();

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--post" => body = rest.next().cloned(),
            "-H" | "--header" => {
                if let Some(line) = rest.next() {
                    merge_headers(&mut headers, [parse_header_line(line)?]);
                }
            }
            other => {
                eprintln!("{}", format!("Unknown argument: {}", other).red());
                std::process::exit(1);
            }
        }
    }

    let request = match body {
        Some(body) => StreamRequest::post(endpoint, headers, body),
        None => StreamRequest::get(endpoint, headers),
    };

    println!("{}", format!("Endpoint: {}", request.endpoint).green());
    println!("{}", format!("Method: {:?}", request.method).cyan());
    println!("{}", "-".repeat(80).dimmed());

    let transport = ReqwestTransport::new()?;
    let mut connection = transport.open(&request).await?;

    println!(
        "{}",
        format!("HTTP {}", connection.handshake.status).bold()
    );
    for (name, value) in connection.handshake.headers.iter() {
        println!("{}", format!("{}: {:?}", name, value).dimmed());
    }
    println!("{}", "-".repeat(80).dimmed());

    let mut count = 0usize;
    while let Some(event) = connection.events.next().await {
        let event = event?;
        count += 1;

        println!("{} {}", "event:".yellow(), event.name);
        if let Some(id) = &event.id {
            println!("{} {}", "id:".yellow(), id);
        }
        if let Some(retry) = event.retry {
            println!("{} {}", "retry:".yellow(), retry);
        }
        println!("{}", event.data.dimmed());

        match serde_json::from_str::<Value>(&event.data) {
            Ok(data) => {
                println!("{}", "Parsed JSON:".green());
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
            Err(e) => {
                eprintln!("{}", format!("JSON parse error: {}", e).red());
            }
        }
        println!();
    }

    println!("{}", "-".repeat(80).dimmed());
    println!("{}", format!("Stream ended after {} events", count).green());

    Ok(())
}
