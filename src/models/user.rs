//! This file defines a registered account and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{Error, models::PasswordHash};

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors, and more flexible generics that can have
/// distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from the raw database integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The ID as the raw database integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated username: 3 to 20 characters from `[A-Za-z0-9_]`.
///
/// Leading and trailing whitespace is trimmed before validation, matching
/// how the sign-up flow treats user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// The minimum username length.
    pub const MIN_LENGTH: usize = 3;
    /// The maximum username length.
    pub const MAX_LENGTH: usize = 20;

    /// Create and validate a username from a string.
    ///
    /// # Errors
    /// Returns an [Error::InvalidUsername] whose message names the first
    /// rule that failed.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let username = raw_username.trim();

        if username.is_empty() {
            return Err(Error::InvalidUsername("Username is required".to_string()));
        }

        if username.len() < Self::MIN_LENGTH {
            return Err(Error::InvalidUsername(format!(
                "Username must be at least {} characters",
                Self::MIN_LENGTH
            )));
        }

        if username.len() > Self::MAX_LENGTH {
            return Err(Error::InvalidUsername(format!(
                "Username must be less than {} characters",
                Self::MAX_LENGTH
            )));
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::InvalidUsername(
                "Username can only contain letters, numbers, and underscores".to_string(),
            ));
        }

        Ok(Self(username.to_string()))
    }

    /// Create a new `Username` without any validation.
    ///
    /// The caller should ensure that `raw_username` already satisfies the
    /// username rules, e.g. a value read back from the database.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_string())
    }

    /// The username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered account of the application.
///
/// Accounts are created through
/// [AccountDirectory::register](crate::AccountDirectory::register) and are
/// never updated or deleted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserID,
    username: Username,
    password_hash: PasswordHash,
    email: EmailAddress,
    created_at: String,
}

impl User {
    /// Create a user from parts that are already known to be valid, e.g. a
    /// row from the database.
    pub fn new_unchecked(
        id: UserID,
        username: Username,
        password_hash: PasswordHash,
        email: EmailAddress,
        created_at: String,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            email,
            created_at,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The unique username the user logs in with.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The storage timestamp recorded when the account was created.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

#[cfg(test)]
mod username_tests {
    use crate::Error;

    use super::Username;

    #[test]
    fn accepts_valid_usernames() {
        for input in ["bob", "alice_92", "A_b_3", "exactly_twenty_chars"] {
            assert!(Username::new(input).is_ok(), "{input:?} should be valid");
        }
    }

    #[test]
    fn trims_whitespace() {
        let username = Username::new("  frank  ").unwrap();

        assert_eq!(username.as_str(), "frank");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            Username::new("   "),
            Err(Error::InvalidUsername("Username is required".to_string()))
        );
    }

    #[test]
    fn rejects_too_short() {
        assert!(matches!(
            Username::new("ab"),
            Err(Error::InvalidUsername(_))
        ));
    }

    #[test]
    fn rejects_too_long() {
        let input = "a".repeat(21);

        assert!(matches!(
            Username::new(&input),
            Err(Error::InvalidUsername(_))
        ));
    }

    #[test]
    fn rejects_invalid_characters() {
        for input in ["has space", "h@ndle", "emoji🦀", "dash-ed"] {
            assert!(
                matches!(Username::new(input), Err(Error::InvalidUsername(_))),
                "{input:?} should be rejected"
            );
        }
    }
}
