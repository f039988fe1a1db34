use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::env;

use crate::error::{McpSseError, Result};

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(value, |caps: &regex::Captures| {
            env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Expand environment variables in every value of a header table
pub fn expand_env_vars(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.clone(), expand_env_var_in_string(value)))
        .collect()
}

/// Parse a `Name: value` header line.
pub fn parse_header_line(line: &str) -> Result<(HeaderName, HeaderValue)> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| McpSseError::InvalidHeader(format!("expected 'Name: value', got '{}'", line)))?;
    header_pair(name, value)
}

pub fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = name.trim();
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| McpSseError::InvalidHeader(format!("'{}': {}", name, e)))?;
    let header_value = HeaderValue::from_str(value.trim())
        .map_err(|e| McpSseError::InvalidHeader(format!("value of '{}': {}", name, e)))?;
    Ok((header_name, header_value))
}

/// Insert each pair, replacing any earlier value under the same name.
pub fn merge_headers<I>(headers: &mut HeaderMap, pairs: I)
where
    I: IntoIterator<Item = (HeaderName, HeaderValue)>,
{
    for (name, value) in pairs {
        headers.insert(name, value);
    }
}
