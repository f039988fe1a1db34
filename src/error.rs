use std::fmt;

#[derive(Debug)]
pub enum McpSseError {
    /// The server answered the handshake with a non-success status.
    HttpStatus {
        status: u16,
        message: String,
    },
    /// A `message` event whose payload is not valid JSON.
    Decode {
        data: String,
        source: serde_json::Error,
    },
    /// A `message` event whose payload is valid JSON but not an object.
    NotAnObject {
        data: String,
    },
    ConfigError(String),
    InvalidHeader(String),
    Connection(String),
    NetworkError(reqwest::Error),
    Timeout,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
}

impl McpSseError {
    /// True for failures that end the current connection attempt.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            McpSseError::HttpStatus { .. }
                | McpSseError::Connection(_)
                | McpSseError::NetworkError(_)
                | McpSseError::Timeout
        )
    }

    /// True for per-event payload failures.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            McpSseError::Decode { .. } | McpSseError::NotAnObject { .. }
        )
    }
}

impl fmt::Display for McpSseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McpSseError::HttpStatus { status, message } => {
                write!(f, "HTTP error (status {}): {}", status, message)
            }
            McpSseError::Decode { source, .. } => {
                write!(f, "Invalid JSON in message event: {}", source)
            }
            McpSseError::NotAnObject { data } => {
                write!(f, "Message event is not a JSON object: {}", data)
            }
            McpSseError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            McpSseError::InvalidHeader(msg) => write!(f, "Invalid header: {}", msg),
            McpSseError::Connection(msg) => write!(f, "Connection error: {}", msg),
            McpSseError::NetworkError(e) => write!(f, "Network error: {}", e),
            McpSseError::Timeout => write!(f, "Stream idle timeout"),
            McpSseError::IoError(e) => write!(f, "IO error: {}", e),
            McpSseError::JsonError(e) => write!(f, "JSON error: {}", e),
            McpSseError::YamlError(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl std::error::Error for McpSseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            McpSseError::Decode { source, .. } => Some(source),
            McpSseError::NetworkError(e) => Some(e),
            McpSseError::IoError(e) => Some(e),
            McpSseError::JsonError(e) => Some(e),
            McpSseError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for McpSseError {
    fn from(err: reqwest::Error) -> Self {
        McpSseError::NetworkError(err)
    }
}

impl From<std::io::Error> for McpSseError {
    fn from(err: std::io::Error) -> Self {
        McpSseError::IoError(err)
    }
}

impl From<serde_json::Error> for McpSseError {
    fn from(err: serde_json::Error) -> Self {
        McpSseError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for McpSseError {
    fn from(err: serde_yaml::Error) -> Self {
        McpSseError::YamlError(err)
    }
}

impl From<anyhow::Error> for McpSseError {
    fn from(err: anyhow::Error) -> Self {
        McpSseError::ConfigError(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, McpSseError>;
