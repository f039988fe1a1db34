use serde::{Deserialize, Serialize};

use super::defaults::{default_connect_timeout_secs, is_default_connect_timeout_secs};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamConfig {
    #[serde(default = "default_connect_timeout_secs")]
    #[serde(skip_serializing_if = "is_default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_secs: Option<u64>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: None,
        }
    }
}
