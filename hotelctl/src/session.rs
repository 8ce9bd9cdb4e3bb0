//! Authenticated session context.
//!
//! A [`Session`] is created by a successful login and dropped on logout. It is
//! passed by reference into every operation handler; nothing else carries the
//! caller's identity.

use crate::types::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    is_manager: bool,
}

impl Session {
    pub fn new(user_id: UserId, is_manager: bool) -> Self {
        Self { user_id, is_manager }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Whether the user was a manager when they logged in. Decides which menu
    /// items are shown; handlers re-check against the database.
    pub fn is_manager(&self) -> bool {
        self.is_manager
    }
}
