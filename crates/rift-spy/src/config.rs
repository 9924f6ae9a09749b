//! Configuration for the request-matching ledger.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpyConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

/// Backend selection for the request history
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Store backend: "inmemory" (default)
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Bound on the number of retained entries; oldest are evicted first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,

    /// JSON snapshot loaded into the store at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

fn default_backend() -> String {
    "inmemory".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            max_entries: None,
            snapshot_path: None,
        }
    }
}

impl SpyConfig {
    /// Load configuration from a YAML (or JSON) file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: SpyConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store.backend != "inmemory" {
            anyhow::bail!(
                "Unsupported store backend: '{}'. Currently supported: inmemory",
                self.store.backend
            );
        }

        if self.store.max_entries == Some(0) {
            anyhow::bail!("store.maxEntries must be greater than 0 when set");
        }

        Ok(())
    }
}
