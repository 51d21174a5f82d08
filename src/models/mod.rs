//! Contains the domain models for the ledger and budget engine.

mod budget;
mod password;
mod transaction;
mod user;

pub use budget::{Budget, MonthKey};
pub use password::PasswordHash;
pub use transaction::{Transaction, TransactionBuilder, TransactionKind};
pub use user::{User, UserID, Username};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
