pub fn default_connect_timeout_secs() -> u64 {
    10
}

pub fn is_default_connect_timeout_secs(value: &u64) -> bool {
    *value == default_connect_timeout_secs()
}

/// Separator between `Name: value` pairs in `MCP_HEADERS`.
pub const ENV_HEADER_SEPARATOR: char = ';';

pub const EXAMPLE_CONFIG: &str = r#"# mcp-probe configuration
endpoint:
  url: http://localhost:8080/mcp/sse
  headers:
    # ${VAR} is replaced with the environment variable's value
    Authorization: "Bearer ${MCP_TOKEN}"

stream:
  connect_timeout_secs: 10
  # Abandon the stream if no bytes arrive for this long (0 or unset: wait forever)
  # idle_timeout_secs: 120

session:
  verbose: false
"#;
