use clap::Parser;
use colored::*;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use mcp_sse_probe::cli::Args;
use mcp_sse_probe::config::{Config, ProbeConfig};
use mcp_sse_probe::mcp::{MessageKind, ReqwestTransport, Sinks, StreamClient};
use mcp_sse_probe::ui::{display_decode_failure, display_headers, display_summary, MessagePrinter};
use mcp_sse_probe::McpSseError;

const CONFIG_INIT_PATH: &str = ".mcp-probe.yaml";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.config_init {
        match ProbeConfig::write_example(Path::new(CONFIG_INIT_PATH)) {
            Ok(()) => {
                println!("{}", format!("Wrote {}", CONFIG_INIT_PATH).green());
                return;
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
                process::exit(1);
            }
        }
    }

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    if config.verbose {
        eprintln!("{}", format!("[mcp] Endpoint: {}", config.endpoint).dimmed());
        // Header values can carry credentials; only names are shown.
        for name in config.headers.keys() {
            eprintln!("{}", format!("[mcp] Header: {} (value hidden)", name).dimmed());
        }
    }

    let transport = match ReqwestTransport::with_options(config.transport_options()) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let printer = Arc::new(MessagePrinter::new(config.verbose));
    let sinks = {
        let (requests, responses, notifications) =
            (printer.clone(), printer.clone(), printer.clone());
        Sinks::new(
            move |message| requests.print(MessageKind::Request, &message),
            move |message| responses.print(MessageKind::Response, &message),
            move |message| notifications.print(MessageKind::Notification, &message),
        )
        .on_decode_error(|failure| display_decode_failure(&failure))
    };

    let client = StreamClient::with_transport(
        config.endpoint.clone(),
        config.headers.clone(),
        sinks,
        Arc::new(transport),
    );

    let header_watcher = if args.show_headers {
        let slot = client.header_slot();
        Some(tokio::spawn(async move {
            display_headers(slot.wait().await);
        }))
    } else {
        None
    };

    let stream = async {
        match &args.data {
            Some(body) => client.send(body.clone()).await,
            None => client.connect().await,
        }
    };

    let result = tokio::select! {
        result = stream => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "Interrupted".yellow());
            Err(McpSseError::Connection("interrupted".to_string()))
        }
    };

    if let Some(watcher) = header_watcher {
        if client.response_headers().is_some() {
            let _ = watcher.await;
        } else {
            watcher.abort();
        }
    }

    match result {
        Ok(summary) => display_summary(&summary),
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
