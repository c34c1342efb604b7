//! Configuration management for Permasearch.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default store server URL.
pub const DEFAULT_STORE_URL: &str = "http://localhost:3179";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the permanode store backend.
    pub store_url: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Host the web UI binds to.
    pub host: String,
    /// Port the web UI binds to.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            user_agent: "Permasearch/0.1".to_string(),
            request_timeout: 30,
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Configuration file structure (`permasearch.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store backend URL.
    #[serde(default)]
    pub store_url: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Web UI bind host.
    #[serde(default)]
    pub host: Option<String>,
    /// Web UI bind port.
    #[serde(default)]
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration from an explicit path, or from the standard
    /// locations (`./permasearch.toml`, then the user config directory).
    /// Missing files are not an error; defaults apply.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::discover(),
        };

        match candidate {
            Some(p) if p.exists() => {
                debug!(path = %p.display(), "loading config");
                let raw = fs::read_to_string(&p)?;
                Ok(toml::from_str(&raw)?)
            }
            _ => Ok(Self::default()),
        }
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from("permasearch.toml");
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir().map(|d| d.join("permasearch").join("permasearch.toml"))
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.store_url {
            settings.store_url = url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
    }
}

/// Load settings, merging any config file over the defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let config = Config::load(path)?;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_store() {
        let s = Settings::default();
        assert_eq!(s.store_url, DEFAULT_STORE_URL);
        assert_eq!(s.port, 8080);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("permasearch.toml");
        fs::write(
            &path,
            "store_url = \"http://store.example:3179\"\nport = 9000\n",
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.store_url, "http://store.example:3179");
        assert_eq!(settings.port, 9000);
        // Untouched fields keep their defaults.
        assert_eq!(settings.request_timeout, 30);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = load_settings(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(settings.store_url, DEFAULT_STORE_URL);
    }
}
