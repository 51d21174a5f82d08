//! Registration and authentication over the user store.

use std::str::FromStr;

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, Username},
    stores::UserStore,
};

/// The minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registers and authenticates accounts.
///
/// Authentication deliberately does not reveal whether a username exists:
/// an unknown username and a wrong password both come back as `None`.
#[derive(Debug, Clone)]
pub struct AccountDirectory<U: UserStore> {
    store: U,
    hash_cost: u32,
}

impl<U: UserStore> AccountDirectory<U> {
    /// Create a directory over `store`, hashing passwords with
    /// [PasswordHash::DEFAULT_COST].
    pub fn new(store: U) -> Self {
        Self {
            store,
            hash_cost: PasswordHash::DEFAULT_COST,
        }
    }

    /// Create a directory with an explicit bcrypt `hash_cost`.
    ///
    /// Tests use a low cost to keep hashing fast; anything user-facing
    /// should use [AccountDirectory::new].
    pub fn with_hash_cost(store: U, hash_cost: u32) -> Self {
        Self { store, hash_cost }
    }

    /// Register a new account.
    ///
    /// The username and email are trimmed before validation. Uniqueness is
    /// decided by the store's constraint check on insert, so two
    /// overlapping registrations for the same name cannot both succeed.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidUsername] if the username is empty, out of the 3-20
    ///   character bounds, or contains characters outside `[A-Za-z0-9_]`,
    /// - [Error::InvalidPassword] if the password is empty or shorter than
    ///   [MIN_PASSWORD_LENGTH],
    /// - [Error::InvalidEmail] if the email is not a valid address,
    /// - [Error::DuplicateUsername] or [Error::DuplicateEmail] if another
    ///   account already uses the field,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn register(&mut self, username: &str, password: &str, email: &str) -> Result<User, Error> {
        let username = Username::new(username)?;

        if password.is_empty() {
            return Err(Error::InvalidPassword("Password is required".to_string()));
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(Error::InvalidPassword(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let email = EmailAddress::from_str(email.trim())
            .map_err(|_| Error::InvalidEmail("Please enter a valid email address".to_string()))?;

        let password_hash = PasswordHash::from_raw_password(password, self.hash_cost)?;

        self.store.create(username, password_hash, email)
    }

    /// Authenticate a `username` and `password` pair.
    ///
    /// Returns the matched account, or `None` when either the username is
    /// unknown or the password is wrong; the caller cannot tell which. The
    /// authenticated user is returned to the caller, which owns any session
    /// it wants to keep; logging out is simply dropping the value.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error. Bad
    /// credentials are not an error.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, Error> {
        let user = match self.store.get_by_username(username.trim()) {
            Ok(user) => user,
            Err(Error::NotFound) => return Ok(None),
            Err(error) => return Err(error),
        };

        match user.password_hash().verify(password) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(error) => Err(Error::HashingError(error.to_string())),
        }
    }

    /// Whether an account with `username` exists.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn username_exists(&self, username: &str) -> Result<bool, Error> {
        self.store.username_exists(username.trim())
    }

    /// Whether an account with `email` exists.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn email_exists(&self, email: &str) -> Result<bool, Error> {
        self.store.email_exists(email.trim())
    }
}
