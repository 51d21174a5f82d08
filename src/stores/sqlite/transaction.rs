//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, MonthKey, Transaction, TransactionBuilder, TransactionKind},
    stores::TransactionStore,
};

const SELECT_COLUMNS: &str = "id, type, date, category, amount, memo";

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread
    /// or is poisoned.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error, including the
    /// storage-side rejection of negative amounts.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO transactions (type, date, category, amount, memo)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, type, date, category, amount, memo",
            )?
            .query_row(
                (
                    builder.kind,
                    builder.date,
                    &builder.category,
                    builder.amount,
                    &builder.memo,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Delete at most one transaction by its `id`.
    ///
    /// Deleting an id that is not in the database succeeds without effect.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM transactions WHERE id = ?1", (id,))?;

        Ok(())
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM transactions WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Retrieve the transactions with dates within `from..=to` (inclusive).
    ///
    /// Rows are ordered by date ascending, then id ascending so that
    /// transactions on the same day keep their insertion order.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_by_period(&self, from: Date, to: Date) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM transactions
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date ASC, id ASC"
            ))?
            .query_map((from, to), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the transactions on `date`, ordered by id ascending.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_by_date(&self, date: Date) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM transactions
                 WHERE date = ?1
                 ORDER BY id ASC"
            ))?
            .query_map((date,), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the transactions in `month`.
    ///
    /// Matches on the `YYYY-MM` prefix of the stored date text, which is
    /// valid because dates are always written as `YYYY-MM-DD`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_by_month(&self, month: MonthKey) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM transactions
                 WHERE date LIKE ?1
                 ORDER BY date ASC, id ASC"
            ))?
            .query_map((month.date_prefix_pattern(),), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// The sum of amounts of `kind` transactions within `from..=to`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn total_by_kind(&self, kind: TransactionKind, from: Date, to: Date) -> Result<i64, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT IFNULL(SUM(amount), 0) FROM transactions
                 WHERE type = ?1 AND date BETWEEN ?2 AND ?3",
                (kind, from, to),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }

    /// The sum of income amounts in `month`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn total_income_of_month(&self, month: MonthKey) -> Result<i64, Error> {
        self.total_of_month(TransactionKind::Income, month)
    }

    /// The sum of expense amounts in `month`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn total_expense_of_month(&self, month: MonthKey) -> Result<i64, Error> {
        self.total_of_month(TransactionKind::Expense, month)
    }

    /// The sum of expense amounts on `date`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn total_expense_of_day(&self, date: Date) -> Result<i64, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT IFNULL(SUM(amount), 0) FROM transactions
                 WHERE type = ?1 AND date = ?2",
                (TransactionKind::Expense, date),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }

    /// Get the total number of transactions in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM transactions;", [], |row| {
                row.get::<_, i64>(0).map(|count| count as usize)
            })
            .map_err(|error| error.into())
    }
}

impl SQLiteTransactionStore {
    fn total_of_month(&self, kind: TransactionKind, month: MonthKey) -> Result<i64, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT IFNULL(SUM(amount), 0) FROM transactions
                 WHERE type = ?1 AND date LIKE ?2",
                (kind, month.date_prefix_pattern()),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    type TEXT NOT NULL CHECK(type IN ('income', 'expense')),
                    date TEXT NOT NULL,
                    category TEXT NOT NULL,
                    amount INTEGER NOT NULL CHECK(amount >= 0),
                    memo TEXT,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                    )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_type_date ON transactions(type, date)",
            (),
        )?;
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category)",
            (),
        )?;
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let kind = row.get(offset + 1)?;
        let date = row.get(offset + 2)?;
        let category = row.get(offset + 3)?;
        let amount = row.get(offset + 4)?;
        let memo = row.get(offset + 5)?;

        Ok(Transaction::new_unchecked(
            id, kind, date, category, amount, memo,
        ))
    }
}
