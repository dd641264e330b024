use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::unpublish::registries::npm::DEFAULT_BASE_URL;

/// Directory name under the platform config dir
const APP_DIR: &str = "npm-unpublish";

/// Log level that hides the status line
pub const SILENT_LOGLEVEL: &str = "silent";

/// Default npm log level
pub const DEFAULT_LOGLEVEL: &str = "notice";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Unpublish configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UnpublishConfig {
    /// Registry base URL
    pub registry: String,
    /// Bearer token for writes
    pub token: Option<String>,
    /// One-time password sent with the first write
    pub otp: Option<String>,
    /// Allow removing every version of a package
    pub force: bool,
    /// Suppress the status line
    pub silent: bool,
    /// npm log level (silent, error, warn, notice, http, info, verbose, silly)
    pub loglevel: String,
    /// Also write JSON logs to this file
    pub log_file: Option<PathBuf>,
}

impl Default for UnpublishConfig {
    fn default() -> Self {
        Self {
            registry: DEFAULT_BASE_URL.to_string(),
            token: None,
            otp: None,
            force: false,
            silent: false,
            loglevel: DEFAULT_LOGLEVEL.to_string(),
            log_file: None,
        }
    }
}

/// Values taken from the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub registry: Option<String>,
    pub otp: Option<String>,
    pub force: bool,
    pub silent: bool,
    pub loglevel: Option<String>,
}

/// Values taken from the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub registry: Option<String>,
    pub token: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            registry: std::env::var("NPM_CONFIG_REGISTRY").ok(),
            token: std::env::var("NPM_TOKEN").ok(),
        }
    }
}

impl UnpublishConfig {
    /// Load the config file at `path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Load configuration, lowest to highest precedence: defaults, config
    /// file, environment, command line.
    ///
    /// An explicit `config_path` must exist; the default location is optional.
    pub fn load(
        config_path: Option<&Path>,
        env: EnvOverrides,
        cli: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let base = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = config_path_default();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(base.with_env(env).with_cli(cli))
    }

    fn with_env(mut self, env: EnvOverrides) -> Self {
        if let Some(registry) = env.registry {
            self.registry = registry;
        }
        if env.token.is_some() {
            self.token = env.token;
        }
        self
    }

    fn with_cli(mut self, cli: ConfigOverrides) -> Self {
        if let Some(registry) = cli.registry {
            self.registry = registry;
        }
        if cli.otp.is_some() {
            self.otp = cli.otp;
        }
        if let Some(loglevel) = cli.loglevel {
            self.loglevel = loglevel;
        }
        self.force |= cli.force;
        self.silent |= cli.silent;
        self
    }

    /// Apply `publishConfig.registry` from the package's own manifest
    pub fn with_registry_override(mut self, registry: Option<String>) -> Self {
        if let Some(registry) = registry {
            self.registry = registry;
        }
        self
    }

    /// Whether the status line must not be printed
    pub fn output_suppressed(&self) -> bool {
        self.silent || self.loglevel == SILENT_LOGLEVEL
    }
}

/// Returns the path to the default config file.
/// Uses $XDG_CONFIG_HOME/npm-unpublish/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/npm-unpublish/config.json,
/// or ./npm-unpublish/config.json if neither is available.
pub fn config_path_default() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
        .join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_DIR)
}
