//! Connection configuration.
//!
//! ONMS_ROOT resolution order:
//! 1. Explicit path passed to Config::with_root() / Config::load_from()
//! 2. ONMS_ROOT environment variable
//! 3. Default: the platform data directory for `onms` (~/.local/share/onms)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::filter::DEFAULT_LIMIT;
use crate::server::{ServerIdentity, ServerMetadata, ServerType, ServerVersion};
use crate::{Error, Result};

/// Client configuration for one OpenNMS server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml. Not stored in the file itself.
    #[serde(skip)]
    pub root: PathBuf,

    /// Base URL of the server, e.g. `http://localhost:8980/opennms`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Version string reported by the server.
    #[serde(default = "default_version")]
    pub version: String,

    /// Product line; detected from `version` when absent.
    #[serde(default)]
    pub server_type: Option<ServerType>,

    #[serde(default)]
    pub username: Option<String>,

    /// Limit applied to filters built from the command line.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

fn default_url() -> String {
    "http://localhost:8980/opennms".to_string()
}

fn default_version() -> String {
    "21.0.0".to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Config {
    /// Create a new config with the given ONMS_ROOT.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            url: default_url(),
            version: default_version(),
            server_type: None,
            username: None,
            default_limit: default_limit(),
        }
    }

    /// Load config from ONMS_ROOT/config.toml, or create default.
    pub fn load() -> Result<Self> {
        let root = resolve_root()?;
        Self::load_from(&root)
    }

    /// Load config from a specific ONMS_ROOT.
    pub fn load_from(root: &Path) -> Result<Self> {
        let config_path = root.join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            config.root = root.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_root(root))
        }
    }

    /// Save config to ONMS_ROOT/config.toml, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(self.config_path(), contents)?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn is_saved(&self) -> bool {
        self.config_path().exists()
    }

    /// Parsed server metadata. An explicit `server_type` wins over detection.
    pub fn metadata(&self) -> Result<ServerMetadata> {
        let version = ServerVersion::parse(&self.version)?;
        let server_type = self
            .server_type
            .unwrap_or_else(|| ServerType::detect(&version));
        Ok(ServerMetadata::new(version, server_type))
    }

    pub fn identity(&self) -> Result<ServerIdentity> {
        Ok(self.metadata()?.identity(&self.url))
    }
}

/// Resolve ONMS_ROOT using the standard resolution order.
pub fn resolve_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("ONMS_ROOT") {
        return Ok(PathBuf::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("org", "opennms", "onms") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".local/share/onms"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ApiVersion;
    use tempfile::TempDir;

    #[test]
    fn test_config_with_root() {
        let config = Config::with_root("/tmp/test-onms");
        assert_eq!(config.root, PathBuf::from("/tmp/test-onms"));
        assert_eq!(config.default_limit, 1000);
        assert_eq!(config.config_path(), PathBuf::from("/tmp/test-onms/config.toml"));
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nested");

        let mut config = Config::with_root(&root);
        config.url = "https://nms.example.com/opennms".to_string();
        config.version = "2018.1.2".to_string();
        config.username = Some("admin".to_string());
        config.save().unwrap();
        assert!(config.is_saved());

        let loaded = Config::load_from(&root).unwrap();
        assert_eq!(loaded.root, root);
        assert_eq!(loaded.url, config.url);
        assert_eq!(loaded.version, "2018.1.2");
        assert_eq!(loaded.username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_load_missing_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(tmp.path()).unwrap();
        assert!(!config.is_saved());
        assert_eq!(config.version, "21.0.0");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "url = [").unwrap();
        assert!(matches!(Config::load_from(tmp.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_metadata_detection_and_override() {
        let mut config = Config::with_root("/tmp/test-onms");
        config.version = "2017.1.0".to_string();
        let meta = config.metadata().unwrap();
        assert_eq!(meta.server_type, ServerType::Meridian);
        assert_eq!(meta.api_version(), ApiVersion::V1);

        config.version = "20.1.0".to_string();
        config.server_type = Some(ServerType::Horizon);
        assert_eq!(config.metadata().unwrap().api_version(), ApiVersion::V1);

        config.version = "not-a-version".to_string();
        assert!(config.metadata().is_err());
    }
}
