//! Storage seam for the request-matching ledger.

use super::error::StoreError;
use super::matcher::Matcher;
use super::types::LogEntry;
use crate::backends::InMemoryMatchStore;
use crate::config::SpyConfig;
use crate::mock::Request;
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::info;

/// Backend-agnostic storage for log entries.
///
/// Implementations must tolerate concurrent `save` calls interleaved with
/// reads. Each read returns a snapshot; it need not observe saves that start
/// after it.
pub trait MatchStore: Send + Sync {
    /// Append an entry to the history
    fn save(&self, entry: LogEntry) -> Result<(), StoreError>;

    /// Drop every entry
    fn reset(&self) -> Result<(), StoreError>;

    /// Drop the entries associated with `request`. What "associated" means is
    /// up to the backend.
    fn reset_match(&self, request: &Request) -> Result<(), StoreError>;

    /// Every entry, in the backend's natural order
    fn get_all(&self) -> Result<Vec<LogEntry>, StoreError>;

    /// At most `limit` entries after skipping `offset`. Past the end is empty, not an error.
    fn get(&self, limit: usize, offset: usize) -> Result<Vec<LogEntry>, StoreError>;
}

/// Create a MatchStore based on configuration
///
/// The matcher is handed to the backend for `reset_match`.
///
/// # Example
/// ```ignore
/// use rift_spy::config::SpyConfig;
/// use rift_spy::spy::create_store;
///
/// let config = SpyConfig::default(); // inmemory, unbounded
/// let store = create_store(&config, matcher)?;
/// ```
pub fn create_store(
    config: &SpyConfig,
    matcher: Arc<dyn Matcher>,
) -> Result<Arc<dyn MatchStore>> {
    config.validate()?;

    match config.store.backend.as_str() {
        "inmemory" => {
            let mut store = InMemoryMatchStore::new(matcher);
            if let Some(max) = config.store.max_entries {
                store = store.with_max_entries(max);
            }
            if let Some(path) = &config.store.snapshot_path {
                store
                    .load_from_file(path)
                    .with_context(|| format!("Failed to load snapshot from {}", path.display()))?;
            }
            info!(
                "Using InMemory MatchStore (max_entries={:?}, entries={})",
                config.store.max_entries,
                store.len()
            );
            Ok(Arc::new(store))
        }
        other => Err(anyhow!("Unknown backend type: {other}")),
    }
}
