//! Screen configuration
//!
//! Values come from defaults, then an optional JSON file, then `WDTL_*`
//! environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::library::LibrarySource;
use crate::translate::SemanticBackend;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "WDTL_CONFIG";

/// Settings shared by every query issued through a [`Screen`](crate::Screen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attribute read by test id queries
    pub test_id_attribute: String,
    /// How long `find` queries poll before giving up
    pub timeout_ms: u64,
    /// Delay between `find` attempts
    pub poll_interval_ms: u64,
    /// How semantic locators are resolved
    pub semantic_backend: SemanticBackend,
    /// Where the DOM query library is loaded from
    pub library: LibrarySource,
    /// Maximum characters of markup shown per element in errors
    pub debug_print_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            test_id_attribute: "data-testid".to_string(),
            timeout_ms: 1000,
            poll_interval_ms: 50,
            semantic_backend: SemanticBackend::Script,
            library: LibrarySource::default(),
            debug_print_limit: 7000,
        }
    }
}

impl Config {
    /// Defaults, overlaid with the config file and environment
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        let config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if std::env::var_os(CONFIG_ENV).is_some() => {
                anyhow::bail!("Config file {} does not exist", path.display())
            }
            _ => Config::default(),
        };

        config.with_env(|key| std::env::var(key).ok())
    }

    /// `<config dir>/webdriver-testing-library/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("webdriver-testing-library").join("config.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `WDTL_*` overrides read through `lookup`
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup("WDTL_TIMEOUT_MS") {
            self.timeout_ms = value
                .parse()
                .with_context(|| format!("Invalid WDTL_TIMEOUT_MS: {}", value))?;
        }
        if let Some(value) = lookup("WDTL_POLL_INTERVAL_MS") {
            self.poll_interval_ms = value
                .parse()
                .with_context(|| format!("Invalid WDTL_POLL_INTERVAL_MS: {}", value))?;
        }
        if let Some(value) = lookup("WDTL_TEST_ID_ATTRIBUTE") {
            self.test_id_attribute = value;
        }
        if let Some(value) = lookup("WDTL_SEMANTIC_BACKEND") {
            self.semantic_backend = value.parse()?;
        }
        if let Some(value) = lookup("WDTL_LIBRARY_URL") {
            self.library = LibrarySource::Url(value);
        }
        // A local bundle wins over a URL
        if let Some(value) = lookup("WDTL_LIBRARY_PATH") {
            self.library = LibrarySource::File(PathBuf::from(value));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.test_id_attribute.trim().is_empty() {
            anyhow::bail!("test_id_attribute must not be empty");
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        self.library.validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis().max(1) as u64;
        self
    }

    pub fn with_backend(mut self, backend: SemanticBackend) -> Self {
        self.semantic_backend = backend;
        self
    }

    pub fn with_test_id_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.test_id_attribute = attribute.into();
        self
    }

    pub fn with_library(mut self, library: LibrarySource) -> Self {
        self.library = library;
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
