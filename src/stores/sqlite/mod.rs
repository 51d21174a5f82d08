//! Contains convenience type alias and function for [AppState] that uses
//! the SQLite backend.

pub mod budget;
pub mod transaction;
pub mod user;

pub use budget::SQLiteBudgetStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteTransactionStore, SQLiteBudgetStore, SQLiteUserStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the
/// domain models to the database.
pub fn create_app_state(db_connection: Connection) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let transaction_store = SQLiteTransactionStore::new(connection.clone());
    let budget_store = SQLiteBudgetStore::new(connection.clone());
    let user_store = SQLiteUserStore::new(connection);

    Ok(AppState::new(transaction_store, budget_store, user_store))
}
