//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, UserID, Username},
};

/// Handles the creation and retrieval of registered accounts.
pub trait UserStore {
    /// Create and insert a new user into the store.
    ///
    /// A uniqueness violation on the username or email column is the
    /// authoritative duplicate signal and surfaces as
    /// [Error::DuplicateUsername] or [Error::DuplicateEmail]; callers do not
    /// need a prior existence check to insert safely.
    fn create(
        &mut self,
        username: Username,
        password_hash: PasswordHash,
        email: EmailAddress,
    ) -> Result<User, Error>;

    /// Get the user with the specified `id`, or [Error::NotFound] if no
    /// such user exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get the user with the specified `username`, or [Error::NotFound] if
    /// no such user exists.
    fn get_by_username(&self, username: &str) -> Result<User, Error>;

    /// Whether a user with `username` exists.
    fn username_exists(&self, username: &str) -> Result<bool, Error>;

    /// Whether a user with `email` exists.
    fn email_exists(&self, email: &str) -> Result<bool, Error>;

    /// The total number of registered users.
    fn count(&self) -> Result<usize, Error>;
}
