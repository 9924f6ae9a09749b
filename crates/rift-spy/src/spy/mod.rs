//! Request-matching ledger for Rift imposters.
//!
//! Every request an imposter serves is recorded as a [`LogEntry`] holding the
//! request, the response and the [`MatchResult`]. The [`Spy`] stores entries
//! through a [`MatchStore`] and answers history queries, including replaying a
//! candidate request against every recorded one through a [`Matcher`].
//!
//! ## Module Structure
//!
//! - `types`: `LogEntry`, `MatchResult`, `MatchFailure`
//! - `id`: entry id generators
//! - `error`: error types
//! - `matcher`: `Matcher` trait and `MatchVerdict`
//! - `store`: `MatchStore` trait
//! - `core`: `Spy` and the `Spier` query trait

mod core;
mod error;
mod id;
mod matcher;
mod store;
mod types;

pub use core::{Spier, Spy};
pub use error::{MatcherError, SpyError, StoreError};
pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use matcher::{MatchVerdict, Matcher};
pub use store::{create_store, MatchStore};
pub use types::{LogEntry, MatchFailure, MatchResult};
