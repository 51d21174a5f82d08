//! SpendMate is an engine for tracking personal income and expenses,
//! monthly budget limits, and the user accounts that own them.
//!
//! This library provides the domain models, the SQLite-backed stores, and
//! the services that the command line tools are built from.

#![warn(missing_docs)]

mod account;
mod app_state;
mod budget;
mod error;
mod session;

pub mod db;
pub mod models;
pub mod stores;

pub use account::{AccountDirectory, MIN_PASSWORD_LENGTH};
pub use app_state::AppState;
pub use budget::BudgetTracker;
pub use error::Error;
pub use session::{LoginResult, SignupResult, log_in, sign_up};
