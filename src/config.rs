use crate::contract::ArityPolicy;
use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".mock-override.toml";

/// Environment variable naming an alternative configuration file
pub const CONFIG_ENV_VAR: &str = "MOCK_OVERRIDE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Whether behaviors may declare fewer parameters than a member supplies
    #[serde(default)]
    pub arity: ArityPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset (e.g. "mock_override=trace")
    #[serde(default)]
    pub filter: Option<String>,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from `MOCK_OVERRIDE_CONFIG`, or from the default
    /// file in the working directory. A missing default file yields defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load_from(&PathBuf::from(path)),
            None => {
                let config_path = Path::new(DEFAULT_CONFIG_FILE);
                if !config_path.exists() {
                    return Ok(Config::default());
                }
                Self::load_from(config_path)
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Read {
            path: config_path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::parse(&content, config_path)
    }

    fn parse(content: &str, config_path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: config_path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load default config if file is missing, otherwise warn on failure and use defaults
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }

    /// Process-wide configuration, loaded on first use.
    pub fn shared() -> &'static Config {
        static SHARED: OnceLock<Config> = OnceLock::new();
        SHARED.get_or_init(Self::load_or_default)
    }
}
