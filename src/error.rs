//! Defines the engine level error type and the conversion from SQLite errors.

use thiserror::Error as ThisError;

/// The errors that may occur in the ledger and budget engine.
#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    /// A transaction kind string was neither `income` nor `expense`.
    #[error("invalid transaction kind {0:?}, expected \"income\" or \"expense\"")]
    InvalidTransactionKind(String),

    /// A month key string did not match the `YYYY-MM` format.
    #[error("invalid month key {0:?}, expected the format YYYY-MM")]
    InvalidMonthKey(String),

    /// A username failed validation. The message explains which rule failed.
    #[error("{0}")]
    InvalidUsername(String),

    /// A password failed validation. The message explains which rule failed.
    #[error("{0}")]
    InvalidPassword(String),

    /// An email address failed validation.
    #[error("{0}")]
    InvalidEmail(String),

    /// The username already exists in the database. The client should try
    /// again with a different username.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// The email address already exists in the database. The client should
    /// try again with a different email address.
    #[error("the email is already registered")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server
    /// side, not shown to the application user.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested row could not be found with the provided info (e.g.,
    /// id). The client can try again with different parameters.
    #[error("the requested record could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("users.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("users.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
