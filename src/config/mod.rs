mod defaults;
mod endpoint;
mod stream;
mod validation;

use crate::cli::Args;
use crate::error::{McpSseError, Result};
use crate::mcp::TransportOptions;
use anyhow::Context;
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub use defaults::{default_connect_timeout_secs, ENV_HEADER_SEPARATOR, EXAMPLE_CONFIG};
pub use endpoint::EndpointConfig;
pub use stream::StreamConfig;
pub use validation::{
    expand_env_var_in_string, expand_env_vars, header_pair, merge_headers, parse_header_line,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Contents of a `.mcp-probe.yaml` (or `.json`) file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Values read from `MCP_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub endpoint: Option<String>,
    pub headers: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub verbose: Option<bool>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("MCP_ENDPOINT").ok(),
            headers: env::var("MCP_HEADERS").ok(),
            connect_timeout_secs: env::var("MCP_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse::<u64>().ok()),
            idle_timeout_secs: env::var("MCP_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse::<u64>().ok()),
            verbose: env::var("MCP_VERBOSE")
                .ok()
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes")),
        }
    }
}

/// Fully resolved settings for one probe run.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub headers: HeaderMap,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: Option<u64>,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = ProbeConfig::load().unwrap_or_else(|e| {
            warn!("ignoring unreadable config file: {:#}", e);
            ProbeConfig::default()
        });

        Self::resolve(args, &EnvOverrides::from_env(), &file_config)
    }

    /// Precedence: CLI args > env vars > config file > defaults. Headers
    /// from all three sources are merged, later sources replacing earlier
    /// values of the same name.
    pub fn resolve(args: &Args, env: &EnvOverrides, file: &ProbeConfig) -> Result<Self> {
        let raw_endpoint = args
            .endpoint
            .clone()
            .or_else(|| env.endpoint.clone())
            .or_else(|| file.endpoint.url.clone())
            .ok_or_else(|| {
                McpSseError::ConfigError(
                    "no endpoint given (pass ENDPOINT, set MCP_ENDPOINT or add endpoint.url to .mcp-probe.yaml)"
                        .to_string(),
                )
            })?;
        let endpoint = parse_endpoint(&expand_env_var_in_string(&raw_endpoint))?;

        let mut headers = HeaderMap::new();

        let file_headers = expand_env_vars(&file.endpoint.headers)
            .into_iter()
            .map(|(name, value)| header_pair(&name, &value))
            .collect::<Result<Vec<_>>>()?;
        merge_headers(&mut headers, file_headers);

        if let Some(env_headers) = &env.headers {
            let pairs = env_headers
                .split(ENV_HEADER_SEPARATOR)
                .filter(|line| !line.trim().is_empty())
                .map(|line| parse_header_line(&expand_env_var_in_string(line)))
                .collect::<Result<Vec<_>>>()?;
            merge_headers(&mut headers, pairs);
        }

        let arg_headers = args
            .headers
            .iter()
            .map(|line| parse_header_line(line))
            .collect::<Result<Vec<_>>>()?;
        merge_headers(&mut headers, arg_headers);

        let connect_timeout_secs = args
            .connect_timeout
            .or(env.connect_timeout_secs)
            .unwrap_or(file.stream.connect_timeout_secs);

        // Zero disables the idle timeout.
        let idle_timeout_secs = args
            .idle_timeout
            .or(env.idle_timeout_secs)
            .or(file.stream.idle_timeout_secs)
            .filter(|secs| *secs > 0);

        let verbose = args.verbose || env.verbose.or(file.session.verbose).unwrap_or(false);

        Ok(Config {
            endpoint,
            headers,
            connect_timeout_secs,
            idle_timeout_secs,
            verbose,
        })
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            idle_timeout: self.idle_timeout_secs.map(Duration::from_secs),
        }
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| McpSseError::ConfigError(format!("invalid endpoint '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(McpSseError::ConfigError(format!(
            "unsupported endpoint scheme '{}' (expected http or https)",
            other
        ))),
    }
}

impl ProbeConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(ProbeConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".mcp-probe.yaml"),
            PathBuf::from(".mcp-probe.yml"),
            PathBuf::from(".mcp-probe.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("mcp-probe");
            paths.push(config_dir.join("mcp-probe.yaml"));
            paths.push(config_dir.join("mcp-probe.yml"));
            paths.push(config_dir.join("mcp-probe.json"));
        }

        paths
    }

    /// Write the example config to `path`. Never overwrites.
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(McpSseError::ConfigError(format!(
                "{} already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, EXAMPLE_CONFIG)?;
        Ok(())
    }
}
