//! ID generation utilities.

use std::sync::Mutex;

use ulid::{Generator, Ulid};
use uuid::Uuid;

/// Shared across generators so IDs stay ordered within one millisecond.
static ULIDS: Mutex<Generator> = Mutex::new(Generator::new());

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new lowercase ULID, used as the primary key of every row.
    ///
    /// ULIDs sort by creation time, so ordering by ID is ordering by recency.
    /// IDs issued in the same millisecond increment the previous one.
    #[must_use]
    pub fn generate(&self) -> String {
        let ulid = ULIDS
            .lock()
            .ok()
            .and_then(|mut generator| generator.generate().ok())
            // Poisoned lock or random-part overflow
            .unwrap_or_else(Ulid::new);
        ulid.to_string().to_lowercase()
    }

    /// Generate a random access token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component, unlike IDs
        Uuid::new_v4().simple().to_string()
    }
}
