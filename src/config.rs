use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub appstore: AppStoreConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppStoreConfig {
    /// Seeded into the registry when no app store has been persisted yet
    pub default_url: String,
    pub sources_file: PathBuf,
    pub registration_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl Default for AppStoreConfig {
    fn default() -> Self {
        Self {
            default_url: "https://github.com/IceWhaleTech/_appstore/archive/refs/heads/main.zip"
                .to_string(),
            sources_file: PathBuf::from("data/appstores.json"),
            registration_timeout_secs: 300,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data/catalog.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_name: "appstore-catalog.log".to_string(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppStoreConfig {
    pub fn registration_timeout(&self) -> Duration {
        Duration::from_secs(self.registration_timeout_secs)
    }
}

impl LoggingConfig {
    pub fn log_file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl Config {
    /// Load configuration from `path`, or from `config.toml` when no path is
    /// given. A missing default file yields the defaults; a missing explicit
    /// file is an error. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("APPSTORE_CATALOG_PORT") {
            self.server.port = port.parse().map_err(|e| {
                CatalogError::Config(format!("Invalid APPSTORE_CATALOG_PORT '{}': {}", port, e))
            })?;
        }
        if let Ok(snapshot) = std::env::var("APPSTORE_CATALOG_SNAPSHOT") {
            self.catalog.snapshot_path = PathBuf::from(snapshot);
        }
        if let Ok(dir) = std::env::var("APPSTORE_CATALOG_LOG_DIR") {
            self.logging.dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.appstore.registration_timeout(), Duration::from_secs(300));
        assert_eq!(
            config.logging.log_file_path(),
            PathBuf::from("logs/appstore-catalog.log")
        );
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9000

            [appstore]
            default_url = "https://example.com/store.zip"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.appstore.default_url, "https://example.com/store.zip");
        assert_eq!(config.appstore.sources_file, PathBuf::from("data/appstores.json"));
        assert_eq!(config.catalog.snapshot_path, PathBuf::from("data/catalog.json"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\nsnapshot_path = \"/tmp/catalog.yaml\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.catalog.snapshot_path, PathBuf::from("/tmp/catalog.yaml"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::from_file(&missing), Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[server]\nport = \"eighty\""),
            Err(CatalogError::Toml(_))
        ));
    }
}
