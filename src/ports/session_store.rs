//! Session store port.
//!
//! An opaque key-value slot holding at most one [`Session`]. The contract
//! mirrors browser storage: reads and writes are synchronous and always
//! reflect the latest write, so callers must read the store again after
//! every suspension point instead of keeping a copy.
//!
//! Persistence failures are the adapter's problem: implementations log them
//! and degrade (a failed read is an absent session), they never return
//! errors to the router or the views.

use crate::domain::Session;

/// Holds the current session, if any.
pub trait SessionStore: Send + Sync {
    /// Returns the stored session.
    fn get(&self) -> Option<Session>;

    /// Replaces the stored session.
    fn set(&self, session: Session);

    /// Removes the stored session. A no-op when none exists.
    fn clear(&self);

    /// Returns true if a session is stored right now.
    fn has_session(&self) -> bool {
        self.get().is_some()
    }
}
