//! Session-related types.
//!
//! The session only ever holds the logged-in user's ID; the user record is
//! reloaded on every request so admin changes apply immediately.

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user's ID.
    pub const USER_ID: &str = "user_id";
}
