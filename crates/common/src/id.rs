//! ID generation utilities.

use ulid::Ulid;

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

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    ///
    /// Sortability is what makes them the tiebreaker for post ordering:
    /// two posts created in the same instant still have a total order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque session token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // Two ULIDs back to back; the concatenation carries enough
        // randomness for a bearer token without a time-leading prefix
        // being guessable on its own.
        format!(
            "{}{}",
            Ulid::new().to_string().to_lowercase(),
            Ulid::new().to_string().to_lowercase()
        )
    }
}
