//! `renta.toml` loading.
//!
//! ```toml
//! [store]
//! backend = "sqlite"
//! connection_string = "renta.db"
//!
//! [logging]
//! level = "info"
//! file = "renta.log"
//! ```
//!
//! Every key is optional. Command-line flags are applied on top with
//! [`RentaConfig::apply_overrides`].

use std::fs;
use std::path::{Path, PathBuf};

use renta_core::storage::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "RENTA_CONFIG";
/// Looked up in the working directory when nothing else names a file.
pub const DEFAULT_CONFIG_FILE: &str = "renta.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "renta.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentaConfig {
    pub store: StoreSection,
    pub logging: LoggingSection,
}

/// Flag values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl RentaConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the first config file found, or the defaults when there is none.
    ///
    /// Lookup order: `explicit` (the `--config` flag), then `$RENTA_CONFIG`,
    /// then `./renta.toml`. A file named by the flag or the variable must
    /// exist; the working-directory file is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match config_path(explicit, from_env, Path::new(DEFAULT_CONFIG_FILE)) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(
        &mut self,
        overrides: ConfigOverrides,
    ) {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(conn) = overrides.connection_string {
            self.store.connection_string = conn;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.log_file.is_some() {
            self.logging.file = overrides.log_file;
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend.clone(),
            connection_string: self.store.connection_string.clone(),
        }
    }
}

fn config_path(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    fallback: &Path,
) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or(from_env)
        .or_else(|| fallback.is_file().then(|| fallback.to_path_buf()))
}
