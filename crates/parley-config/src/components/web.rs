//! Relay server configuration

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::{ConfigError, ConfigResult};

/// HTTP settings for the relay endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Directory with the built landing page, served as a fallback
    pub static_dir: Option<String>,
    /// Origins allowed by CORS; empty allows none beyond same-origin
    pub allowed_origins: Vec<String>,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Seconds between SSE keep-alive comments
    pub keep_alive_secs: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
            static_dir: None,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            max_body_bytes: defaults::DEFAULT_MAX_BODY_BYTES,
            keep_alive_secs: defaults::DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl WebConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::invalid("web.port", "must be non-zero"));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::invalid("web.max_body_bytes", "must be non-zero"));
        }
        Ok(())
    }
}
