//! Error types for ledger operations.
//!
//! All recoverable conditions raised by the ledger are represented by the
//! `LedgerError` enum. Every variant is local and synchronous: validation
//! happens before any mutation, so a returned error never leaves the
//! ledger in a partially updated state. "Nothing to undo" is deliberately
//! not an error (see [`crate::ledger::UndoOutcome`]).

use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// # Examples
///
/// ```rust
/// use polostat::LedgerError;
///
/// let err = LedgerError::DuplicateName("Taylor Smith".into());
/// println!("{}", err); // "Duplicate player name: Taylor Smith"
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A required text input was empty or whitespace-only.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A player with this exact name already exists.
    ///
    /// Matching is case-sensitive: `"taylor"` and `"Taylor"` are
    /// distinct players.
    #[error("Duplicate player name: {0}")]
    DuplicateName(String),

    /// Attempted removal of a preloaded player.
    ///
    /// Preloaded roster players are mutable as to cap and counters but
    /// immutable as to existence. Only manually added players can be
    /// removed.
    #[error("Player is preloaded and cannot be removed: {0}")]
    Protected(String),

    /// A category name was empty, already registered, or collides with a
    /// fixed category name for either role.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// An operation referenced a player or opponent that does not exist.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnknownEntity("cap 31".into());
        assert!(err.to_string().contains("cap 31"));
    }

    #[test]
    fn test_duplicate_name_display() {
        let err = LedgerError::DuplicateName("Alex".into());
        let display = err.to_string();
        assert!(display.contains("Duplicate"));
        assert!(display.contains("Alex"));
    }
}
