//! Stale-selection guard.
//!
//! When the user switches documents faster than rendering completes, a
//! result computed for an earlier selection must not overwrite the current
//! one. Each selection bumps a generation counter; a result is only accepted
//! if its token still matches the counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionToken(u64);

/// Generation counter guarding against stale render results.
#[derive(Debug, Default)]
pub struct SelectionGuard {
    generation: AtomicU64,
}

impl SelectionGuard {
    /// Create a guard with no selections made.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection, invalidating all earlier tokens.
    pub fn begin(&self) -> SelectionToken {
        SelectionToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if `token` belongs to the most recent selection.
    #[must_use]
    pub fn is_current(&self, token: SelectionToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }

    /// Accept `value` only if `token` is still current.
    pub fn accept<T>(&self, token: SelectionToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            tracing::debug!("discarding stale selection result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_token_is_accepted() {
        let guard = SelectionGuard::new();
        let token = guard.begin();
        assert_eq!(guard.accept(token, "view"), Some("view"));
    }

    #[test]
    fn test_superseded_token_is_discarded() {
        let guard = SelectionGuard::new();
        let first = guard.begin();
        let second = guard.begin();
        assert_eq!(guard.accept(first, "old"), None);
        assert_eq!(guard.accept(second, "new"), Some("new"));
    }

    #[test]
    fn test_token_stays_valid_until_next_selection() {
        let guard = SelectionGuard::new();
        let token = guard.begin();
        assert!(guard.is_current(token));
        assert_eq!(guard.accept(token, 1), Some(1));
        // Accepting does not consume the token.
        assert_eq!(guard.accept(token, 2), Some(2));
    }
}
