//! The spy: records match events and answers history queries.

use super::error::StoreError;
use super::matcher::Matcher;
use super::store::MatchStore;
use super::types::LogEntry;
use crate::metrics;
use crate::mock::{Definition, Request};
use std::sync::Arc;
use tracing::{debug, warn};

/// Query surface over the request history, on top of plain storage
pub trait Spier: MatchStore {
    /// Recorded entries whose request the candidate would have matched
    fn find(&self, candidate: &Request) -> Result<Vec<LogEntry>, StoreError>;

    /// Entries that matched a definition when they were served
    fn get_matched(&self) -> Result<Vec<LogEntry>, StoreError>;

    /// Entries that matched no definition when they were served
    fn get_unmatched(&self) -> Result<Vec<LogEntry>, StoreError>;
}

/// Stateless orchestrator over a [`MatchStore`] and a [`Matcher`].
///
/// All history lives in the store. Store errors are passed through untouched.
#[derive(Clone)]
pub struct Spy {
    store: Arc<dyn MatchStore>,
    matcher: Arc<dyn Matcher>,
}

impl Spy {
    pub fn new(matcher: Arc<dyn Matcher>, store: Arc<dyn MatchStore>) -> Self {
        Self { store, matcher }
    }

    fn filter_by_result(&self, found: bool) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self
            .store
            .get_all()?
            .into_iter()
            .filter(|entry| entry.result().is_found() == found)
            .collect())
    }
}

impl MatchStore for Spy {
    fn save(&self, entry: LogEntry) -> Result<(), StoreError> {
        let found = entry.result().is_found();
        debug!(
            "Saving log entry {} ({} {}, matched={})",
            entry.id(),
            entry.request().method,
            entry.request().path,
            found
        );
        self.store.save(entry)?;
        metrics::record_entry_saved(found);
        Ok(())
    }

    fn reset(&self) -> Result<(), StoreError> {
        debug!("Resetting request history");
        self.store.reset()
    }

    fn reset_match(&self, request: &Request) -> Result<(), StoreError> {
        debug!(
            "Resetting history matching {} {}",
            request.method, request.path
        );
        self.store.reset_match(request)
    }

    fn get_all(&self) -> Result<Vec<LogEntry>, StoreError> {
        self.store.get_all()
    }

    fn get(&self, limit: usize, offset: usize) -> Result<Vec<LogEntry>, StoreError> {
        self.store.get(limit, offset)
    }
}

impl Spier for Spy {
    fn find(&self, candidate: &Request) -> Result<Vec<LogEntry>, StoreError> {
        let history = self.store.get_all()?;
        let definition = Definition::from_request(candidate.clone());
        let total = history.len();

        let found: Vec<LogEntry> = history
            .into_iter()
            .filter(|entry| {
                match self.matcher.matches(entry.request(), &definition, false) {
                    Ok(verdict) => verdict.matched,
                    Err(e) => {
                        // One unreadable record must not abort the whole query
                        warn!("Skipping log entry {} during find: {}", entry.id(), e);
                        metrics::record_matcher_error("find");
                        false
                    }
                }
            })
            .collect();

        debug!(
            "find {} {}: {} of {} recorded requests matched",
            candidate.method,
            candidate.path,
            found.len(),
            total
        );
        metrics::record_find(!found.is_empty());
        Ok(found)
    }

    fn get_matched(&self) -> Result<Vec<LogEntry>, StoreError> {
        self.filter_by_result(true)
    }

    fn get_unmatched(&self) -> Result<Vec<LogEntry>, StoreError> {
        self.filter_by_result(false)
    }
}
