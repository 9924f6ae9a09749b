//! Rift spy: the request-matching ledger behind imposter request history.
//!
//! Records every served request with its response and match outcome, and
//! answers history queries (matched, unmatched, paginated, and replay via
//! [`Spier::find`]).

pub mod backends;
pub mod config;
pub mod metrics;
pub mod mock;
pub mod spy;

pub use backends::InMemoryMatchStore;
pub use config::{SpyConfig, StoreConfig};
pub use mock::{Definition, Request, Response};
pub use spy::{
    create_store, IdGenerator, LogEntry, MatchFailure, MatchResult, MatchStore, MatchVerdict,
    Matcher, MatcherError, SequentialIdGenerator, Spier, Spy, SpyError, StoreError,
    UuidIdGenerator,
};
