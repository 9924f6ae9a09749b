//! Matching seam between recorded requests and mock definitions.

use super::error::MatcherError;
use crate::mock::{Definition, Request};

/// Verdict returned by a [`Matcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchVerdict {
    pub matched: bool,
    /// Why the request did not match; `None` on a match
    pub reason: Option<String>,
}

impl MatchVerdict {
    pub fn matched() -> Self {
        Self {
            matched: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            matched: false,
            reason: Some(reason.into()),
        }
    }
}

/// Predicate evaluator deciding whether a request satisfies a definition.
///
/// Synchronous so it can be shared with stores and called while holding
/// their locks. `strict` is interpreted by the implementation; replay
/// queries always pass `false`.
pub trait Matcher: Send + Sync {
    fn matches(
        &self,
        request: &Request,
        definition: &Definition,
        strict: bool,
    ) -> Result<MatchVerdict, MatcherError>;
}
