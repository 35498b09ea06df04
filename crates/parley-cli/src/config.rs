//! Configuration loading with command-line overrides

use anyhow::{Context, Result};
use parley_config::{Config, ConfigLoader};
use std::path::PathBuf;

use crate::cli::Commands;

/// Load file and environment layers, then apply flags from `command`
pub fn load(path: Option<PathBuf>, command: &Commands) -> Result<Config> {
    let loader = match &path {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load().with_context(|| match &path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    apply_overrides(&mut config, command);
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

/// Apply subcommand flags on top of a loaded configuration
pub fn apply_overrides(config: &mut Config, command: &Commands) {
    match command {
        Commands::Serve {
            host,
            port,
            provider,
            model,
        } => {
            if let Some(host) = host {
                config.web.host = host.clone();
            }
            if let Some(port) = port {
                config.web.port = *port;
            }
            if let Some(provider) = provider {
                config.chat.provider = *provider;
            }
            if let Some(model) = model {
                config.chat.model = Some(model.clone());
            }
        }
        Commands::Chat { url } | Commands::Ask { url, .. } => {
            if let Some(url) = url {
                config.client.relay_url = url.clone();
            }
        }
        Commands::Config => {}
    }
}
