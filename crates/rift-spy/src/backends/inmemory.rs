use crate::metrics;
use crate::mock::{Definition, Request};
use crate::spy::{LogEntry, MatchStore, Matcher, StoreError};
use parking_lot::RwLock;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// In-memory implementation of MatchStore
///
/// Entries are kept in insertion order. With `max_entries` set, the oldest
/// entries are evicted once the bound is exceeded.
pub struct InMemoryMatchStore {
    entries: RwLock<VecDeque<LogEntry>>,
    matcher: Arc<dyn Matcher>,
    max_entries: Option<usize>,
}

impl InMemoryMatchStore {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            matcher,
            max_entries: None,
        }
    }

    /// Bound the history to `max_entries`, evicting the oldest first
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn evict_overflow(&self, entries: &mut VecDeque<LogEntry>) {
        if let Some(max) = self.max_entries {
            while entries.len() > max {
                if let Some(evicted) = entries.pop_front() {
                    debug!("Evicted log entry {} (max_entries={})", evicted.id(), max);
                }
            }
        }
    }

    /// Save entries to file (JSON format)
    pub fn save_to_file(&self, path: &Path) -> Result<(), StoreError> {
        let entries = self.entries.read();
        let json = serde_json::to_string_pretty(&*entries)?;

        fs::write(path, json)?;
        info!("Saved {} log entries to {:?}", entries.len(), path);
        Ok(())
    }

    /// Load entries from file (JSON format), appending them to the history.
    ///
    /// Entries whose id is already present are skipped. Returns the number
    /// of entries added.
    pub fn load_from_file(&self, path: &Path) -> Result<usize, StoreError> {
        if !path.exists() {
            debug!("Snapshot file {:?} does not exist, starting fresh", path);
            return Ok(0);
        }

        let json = fs::read_to_string(path)?;
        let loaded: Vec<LogEntry> = serde_json::from_str(&json)?;

        let total = loaded.len();
        let mut entries = self.entries.write();
        let mut known: HashSet<String> = entries.iter().map(|e| e.id().to_string()).collect();
        let before = entries.len();
        for entry in loaded {
            if known.insert(entry.id().to_string()) {
                entries.push_back(entry);
            } else {
                debug!("Skipping duplicate log entry {} from {:?}", entry.id(), path);
            }
        }
        let count = entries.len() - before;
        self.evict_overflow(&mut entries);

        info!(
            "Loaded {} log entries from {:?} ({} duplicates skipped)",
            count,
            path,
            total - count
        );
        Ok(count)
    }
}

impl MatchStore for InMemoryMatchStore {
    fn save(&self, entry: LogEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        entries.push_back(entry);
        self.evict_overflow(&mut entries);
        Ok(())
    }

    fn reset(&self) -> Result<(), StoreError> {
        self.entries.write().clear();
        Ok(())
    }

    /// Removes every entry whose recorded request matches `request` in
    /// non-strict mode. Entries the matcher fails on are kept.
    fn reset_match(&self, request: &Request) -> Result<(), StoreError> {
        let definition = Definition::from_request(request.clone());
        let mut entries = self.entries.write();
        let before = entries.len();

        entries.retain(|entry| {
            match self.matcher.matches(entry.request(), &definition, false) {
                Ok(verdict) => !verdict.matched,
                Err(e) => {
                    warn!("Keeping log entry {} during reset_match: {}", entry.id(), e);
                    metrics::record_matcher_error("reset_match");
                    true
                }
            }
        });

        debug!(
            "reset_match {} {} removed {} entries",
            request.method,
            request.path,
            before - entries.len()
        );
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self.entries.read().iter().cloned().collect())
    }

    fn get(&self, limit: usize, offset: usize) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self
            .entries
            .read()
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spy::{MatchFailure, MatchResult, MatchVerdict, MatcherError};
    use tempfile::TempDir;

    /// Matches on path only; errors on `/poison`
    struct PathOnly;

    impl Matcher for PathOnly {
        fn matches(
            &self,
            request: &Request,
            definition: &Definition,
            _strict: bool,
        ) -> Result<MatchVerdict, MatcherError> {
            if request.path == "/poison" {
                return Err(MatcherError("unreadable".into()));
            }
            if request.path == definition.request.path {
                Ok(MatchVerdict::matched())
            } else {
                Ok(MatchVerdict::rejected("Path not match"))
            }
        }
    }

    fn store() -> InMemoryMatchStore {
        InMemoryMatchStore::new(Arc::new(PathOnly))
    }

    fn entry(path: &str) -> LogEntry {
        LogEntry::new(
            Request::new("GET", path),
            None,
            MatchResult::not_found(path, vec![MatchFailure::new("a.json", "Path not match")]),
        )
    }

    fn paths(entries: &[LogEntry]) -> Vec<String> {
        entries.iter().map(|e| e.request().path.clone()).collect()
    }

    #[test]
    fn test_save_appends_in_order() {
        let store = store();
        for path in ["/1", "/2", "/3"] {
            store.save(entry(path)).unwrap();
        }
        assert_eq!(store.len(), 3);
        assert_eq!(paths(&store.get_all().unwrap()), vec!["/1", "/2", "/3"]);
    }

    #[test]
    fn test_get_slices_from_offset() {
        let store = store();
        for i in 0..5 {
            store.save(entry(&format!("/{i}"))).unwrap();
        }

        assert_eq!(paths(&store.get(2, 1).unwrap()), vec!["/1", "/2"]);
        assert_eq!(paths(&store.get(10, 3).unwrap()), vec!["/3", "/4"]);
        assert!(store.get(3, 5).unwrap().is_empty());
        assert!(store.get(3, usize::MAX).unwrap().is_empty());
        assert_eq!(store.get(usize::MAX, 4).unwrap().len(), 1);
    }

    #[test]
    fn test_reset() {
        let store = store();
        store.save(entry("/a")).unwrap();
        store.reset().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_match_removes_only_matching() {
        let store = store();
        for path in ["/a", "/b", "/a", "/c"] {
            store.save(entry(path)).unwrap();
        }

        store.reset_match(&Request::new("GET", "/a")).unwrap();

        assert_eq!(paths(&store.get_all().unwrap()), vec!["/b", "/c"]);
    }

    #[test]
    fn test_reset_match_keeps_entries_matcher_fails_on() {
        let store = store();
        store.save(entry("/poison")).unwrap();
        store.save(entry("/a")).unwrap();

        store.reset_match(&Request::new("GET", "/poison")).unwrap();

        assert_eq!(paths(&store.get_all().unwrap()), vec!["/poison", "/a"]);
    }

    #[test]
    fn test_max_entries_evicts_oldest() {
        let store = store().with_max_entries(2);
        for path in ["/1", "/2", "/3"] {
            store.save(entry(path)).unwrap();
        }
        assert_eq!(paths(&store.get_all().unwrap()), vec!["/2", "/3"]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spy.json");

        let original = store();
        original.save(entry("/a")).unwrap();
        original.save(entry("/b")).unwrap();
        original.save_to_file(&path).unwrap();

        let restored = store();
        assert_eq!(restored.load_from_file(&path).unwrap(), 2);
        assert_eq!(restored.get_all().unwrap(), original.get_all().unwrap());
    }

    #[test]
    fn test_reload_does_not_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spy.json");
        let store = store();
        store.save(entry("/a")).unwrap();
        store.save(entry("/b")).unwrap();
        store.save_to_file(&path).unwrap();

        assert_eq!(store.load_from_file(&path).unwrap(), 0);
        store.save(entry("/c")).unwrap();
        assert_eq!(store.load_from_file(&path).unwrap(), 0);

        let all = store.get_all().unwrap();
        let ids: HashSet<&str> = all.iter().map(LogEntry::id).collect();
        assert_eq!(all.len(), 3);
        assert_eq!(ids.len(), 3);
        assert_eq!(paths(&all), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_load_twice_into_fresh_store_keeps_ids_distinct() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spy.json");
        let original = store();
        original.save(entry("/a")).unwrap();
        original.save_to_file(&path).unwrap();

        let restored = store();
        assert_eq!(restored.load_from_file(&path).unwrap(), 1);
        assert_eq!(restored.load_from_file(&path).unwrap(), 0);
        assert_eq!(restored.get_all().unwrap(), original.get_all().unwrap());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store();
        assert_eq!(store.load_from_file(&dir.path().join("absent.json")).unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let err = store().load_from_file(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_load_respects_max_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spy.json");
        let original = store();
        for p in ["/1", "/2", "/3"] {
            original.save(entry(p)).unwrap();
        }
        original.save_to_file(&path).unwrap();

        let restored = store().with_max_entries(2);
        restored.load_from_file(&path).unwrap();
        assert_eq!(paths(&restored.get_all().unwrap()), vec!["/2", "/3"]);
    }

    #[test]
    fn test_concurrent_saves_and_reads() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.save(entry(&format!("/{t}/{i}"))).unwrap();
                        let _ = store.get_all().unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 400);
        // Each writer's entries stay in the order it saved them
        for t in 0..8 {
            let prefix = format!("/{t}/");
            let own: Vec<String> = paths(&all)
                .into_iter()
                .filter(|p| p.starts_with(&prefix))
                .collect();
            let expected: Vec<String> = (0..50).map(|i| format!("/{t}/{i}")).collect();
            assert_eq!(own, expected);
        }
    }
}
