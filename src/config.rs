//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/users-service/config.toml`).
//! Every section and field has a default, so a partial file or no file at
//! all is valid.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! backend = "sqlite"
//! path = "./users.db"
//!
//! [validation]
//! default_locale = "en"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::UserServiceConfig;
use crate::infrastructure::DatabaseConfig;
use crate::shared::Locale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// `~/.config/users-service/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("users-service").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub paging: PagingConfig,
    pub validation: ValidationConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub backend: StorageBackend,
    /// Full connection URL; takes precedence over `path`
    pub url: Option<String>,
    /// SQLite file, created if missing
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            url: None,
            path: "./users.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => DatabaseConfig::sqlite(&self.path).url,
        }
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        let url = self.connection_url();
        // every connection to `sqlite::memory:` is a separate database
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            self.max_connections
        };
        DatabaseConfig {
            url,
            max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_size: u64,
    pub max_size: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        let service = UserServiceConfig::default();
        Self {
            default_size: service.default_page_size,
            max_size: service.max_page_size,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub default_locale: Locale,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Wipe the store and restore the 20 seed users at startup
    pub reset_on_start: bool,
}

impl AppConfig {
    /// Read and validate `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paging.default_size == 0 {
            return Err(ConfigError::Invalid {
                field: "paging.default_size",
                reason: "must be positive".to_string(),
            });
        }
        if self.paging.max_size < self.paging.default_size {
            return Err(ConfigError::Invalid {
                field: "paging.max_size",
                reason: format!(
                    "{} is below paging.default_size {}",
                    self.paging.max_size, self.paging.default_size
                ),
            });
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid {
                field: "logging.format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.logging.format),
            });
        }
        Ok(())
    }

    pub fn service_config(&self) -> UserServiceConfig {
        UserServiceConfig {
            default_page_size: self.paging.default_size,
            max_page_size: self.paging.max_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.backend, StorageBackend::Sqlite);
        assert_eq!(cfg.validation.default_locale, Locale::Ru);
        assert!(!cfg.seed.reset_on_start);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[database]\nbackend = \"memory\"\n\n[validation]\ndefault_locale = \"en\""
        )
        .unwrap();

        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.backend, StorageBackend::Memory);
        assert_eq!(cfg.validation.default_locale, Locale::En);
        assert_eq!(cfg.paging.default_size, 20);
    }

    #[test]
    fn broken_toml_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        match AppConfig::load(file.path()) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn max_size_below_default_is_rejected() {
        let err = AppConfig::from_toml("[paging]\ndefault_size = 50\nmax_size = 10").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "paging.max_size",
                ..
            }
        ));
    }

    #[test]
    fn url_overrides_path() {
        let mut db = DatabaseSection::default();
        assert_eq!(db.connection_url(), "sqlite://./users.db?mode=rwc");

        db.url = Some("sqlite::memory:".to_string());
        let cfg = db.to_database_config();
        assert_eq!(cfg.url, "sqlite::memory:");
        assert_eq!(cfg.max_connections, 1);
    }
}
