//! Ledger value types: match outcomes and log entries.

use super::error::SpyError;
use super::id::{IdGenerator, UuidIdGenerator};
use crate::mock::{Request, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============================================================================
// Match Outcome
// ============================================================================

/// A stub that was tried against a request and rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFailure {
    pub uri: String,
    pub reason: String,
}

impl MatchFailure {
    pub fn new(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of matching a request against the configured definitions.
///
/// A found result never carries failures; use [`MatchResult::found`] and
/// [`MatchResult::not_found`] to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatchResultRaw")]
pub struct MatchResult {
    #[serde(rename = "match")]
    found: bool,
    uri: String,
    errors: Vec<MatchFailure>,
}

/// Unchecked wire form, validated on the way in
#[derive(Deserialize)]
struct MatchResultRaw {
    #[serde(rename = "match")]
    found: bool,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    errors: Option<Vec<MatchFailure>>,
}

impl TryFrom<MatchResultRaw> for MatchResult {
    type Error = String;

    fn try_from(raw: MatchResultRaw) -> Result<Self, Self::Error> {
        let errors = raw.errors.unwrap_or_default();
        if raw.found && !errors.is_empty() {
            return Err(format!(
                "match result for '{}' is found but carries {} error(s)",
                raw.uri,
                errors.len()
            ));
        }
        Ok(Self {
            found: raw.found,
            uri: raw.uri,
            errors,
        })
    }
}

impl MatchResult {
    pub fn found(uri: impl Into<String>) -> Self {
        Self {
            found: true,
            uri: uri.into(),
            errors: Vec::new(),
        }
    }

    /// A miss, with one failure per candidate tried, in evaluation order
    pub fn not_found(uri: impl Into<String>, errors: Vec<MatchFailure>) -> Self {
        Self {
            found: false,
            uri: uri.into(),
            errors,
        }
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn errors(&self) -> &[MatchFailure] {
        &self.errors
    }
}

// ============================================================================
// Log Entry
// ============================================================================

/// One recorded request, the response served for it, and its match outcome.
///
/// Entries are immutable once built; the ledger only ever drops them in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    id: String,
    /// Unix timestamp in seconds
    time: i64,
    request: Request,
    response: Option<Response>,
    result: MatchResult,
}

impl LogEntry {
    /// Build an entry with an id from [`UuidIdGenerator`], stamped with the current time
    pub fn new(request: Request, response: Option<Response>, result: MatchResult) -> Self {
        Self::with_id(UuidIdGenerator.generate(), request, response, result)
    }

    /// Build an entry using the given id source
    pub fn create(
        ids: &dyn IdGenerator,
        request: Request,
        response: Option<Response>,
        result: MatchResult,
    ) -> Result<Self, SpyError> {
        let id = ids.next_id().map_err(SpyError::IdGeneration)?;
        Ok(Self::with_id(id, request, response, result))
    }

    fn with_id(
        id: String,
        request: Request,
        response: Option<Response>,
        result: MatchResult,
    ) -> Self {
        Self {
            id,
            time: Utc::now().timestamp(),
            request,
            response,
            result,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn result(&self) -> &MatchResult {
        &self.result
    }
}
