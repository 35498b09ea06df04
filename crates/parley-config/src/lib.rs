//! # Parley Configuration
//!
//! Layered configuration for the relay server and the chat client.
//!
//! Resolution order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`~/.config/parley/config.toml` unless a path is given)
//! 3. `PARLEY_*` environment variables
//! 4. Command-line flags (applied by the CLI)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parley_config::ConfigLoader;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load()?;
//!     println!("relay on {}:{}", config.web.host, config.web.port);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod error;
mod loader;

pub use components::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::{apply_env_overrides, default_config_path, ConfigLoader};

use serde::{Deserialize, Serialize};

/// Complete Parley configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relay server settings
    pub web: WebConfig,
    /// Generation backend settings used by the relay
    pub chat: ChatConfig,
    /// Reconciler settings used by chat clients
    pub client: ClientConfig,
}

impl Config {
    /// Check cross-field constraints
    pub fn validate(&self) -> ConfigResult<()> {
        self.web.validate()?;
        self.chat.validate()?;
        self.client.validate()?;
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
