//! Configuration loading from file and environment

use std::path::{Path, PathBuf};

use crate::{Config, ConfigError, ConfigResult};

/// Default config file location (`~/.config/parley/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parley").join("config.toml"))
}

/// Builds a [`Config`] from defaults, a TOML file and the environment
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the default file location and the process environment
    pub fn new() -> Self {
        Self {
            path: None,
            use_env: true,
        }
    }

    /// Read from an explicit file; unlike the default location it must exist
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Skip `PARLEY_*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Resolve and validate the configuration
    pub fn load(&self) -> ConfigResult<Config> {
        let mut config = match &self.path {
            Some(path) => Self::read_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        if self.use_env {
            apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> ConfigResult<Config> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Apply `PARLEY_*` overrides using `lookup` to read variables
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("PARLEY_HOST") {
        config.web.host = host;
    }

    if let Some(port) = lookup("PARLEY_PORT") {
        config.web.port = port
            .parse()
            .map_err(|_| ConfigError::invalid("web.port", format!("'{port}' is not a port number")))?;
    }

    if let Some(provider) = lookup("PARLEY_PROVIDER") {
        config.chat.provider = provider.parse()?;
    }

    if let Some(model) = lookup("PARLEY_MODEL") {
        config.chat.model = Some(model);
    }

    if let Some(endpoint) = lookup("PARLEY_ENDPOINT") {
        config.chat.endpoint = Some(endpoint);
    }

    if let Some(url) = lookup("PARLEY_RELAY_URL") {
        config.client.relay_url = url;
    }

    Ok(())
}
