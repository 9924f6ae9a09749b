//! Entry identifier generation.

use parking_lot::Mutex;
use uuid::Uuid;

/// Source of unique log entry identifiers.
///
/// Injected into [`LogEntry::create`](super::LogEntry::create) so tests can
/// produce deterministic ids.
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh identifier. An error here is fatal for the entry being built.
    fn next_id(&self) -> Result<String, String>;
}

/// Random UUID v4 identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    /// Infallible form of [`IdGenerator::next_id`]
    pub fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> Result<String, String> {
        Ok(self.generate())
    }
}

/// Monotonic `{prefix}-{n}` identifiers, starting at 1
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Mutex<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Mutex::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Result<String, String> {
        let mut next = self.next.lock();
        let id = format!("{}-{}", self.prefix, *next);
        *next = next
            .checked_add(1)
            .ok_or_else(|| "sequential id space exhausted".to_string())?;
        Ok(id)
    }
}
