//! Chat client configuration

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::{ConfigError, ConfigResult};

/// Settings for the stream reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the relay's chat endpoint
    pub relay_url: String,
    /// Upper bound on one turn, from submit until the stream ends
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: defaults::DEFAULT_RELAY_URL.to_string(),
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if !(self.relay_url.starts_with("http://") || self.relay_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "client.relay_url",
                format!("'{}' is not an http(s) URL", self.relay_url),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("client.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }
}
