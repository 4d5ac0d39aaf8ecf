//! Server configuration.
//!
//! Settings come from an optional YAML file named by `HTTPD_CONFIG`, with the
//! `LISTEN` and `DOC_ROOT` environment variables taking precedence over it.
//!
//! ```yaml
//! server:
//!   listen_addr: "0.0.0.0:8080"
//!   read_timeout_secs: 5
//! static_files:
//!   doc_root: "/srv/www"
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::connection::DEFAULT_READ_TIMEOUT;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the listener binds to, e.g. "127.0.0.1:8080"
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// How long a connection may sit waiting for (the rest of) a request
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// Directory that request targets are resolved against
    #[serde(default = "default_doc_root")]
    pub doc_root: PathBuf,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_read_timeout_secs() -> u64 {
    DEFAULT_READ_TIMEOUT.as_secs()
}

fn default_doc_root() -> PathBuf {
    PathBuf::from("./public")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            doc_root: default_doc_root(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the process environment.
    pub fn from_env_with<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("HTTPD_CONFIG") {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml_str(&raw)
                    .with_context(|| format!("invalid config file {}", path))?
            }
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Some(root) = lookup("DOC_ROOT") {
            cfg.static_files.doc_root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        Ok(cfg)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.server.read_timeout_secs)
    }
}
