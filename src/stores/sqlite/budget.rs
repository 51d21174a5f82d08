//! Implements a SQLite backed budget store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Budget, MonthKey},
    stores::BudgetStore,
};

/// Stores monthly budget limits in a SQLite database, one row per month.
#[derive(Debug, Clone)]
pub struct SQLiteBudgetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBudgetStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl BudgetStore for SQLiteBudgetStore {
    /// Insert a budget for `month`, or update the limit of the existing row.
    ///
    /// The insert-or-update is a single statement keyed by the unique
    /// `year_month` column, so two overlapping saves for the same month
    /// cannot produce a duplicate row or a lost update of a partial write.
    /// The last writer's limit wins.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread
    /// or is poisoned.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error, including the
    /// storage-side rejection of negative limits.
    fn upsert(&mut self, month: MonthKey, limit: i64) -> Result<Budget, Error> {
        let budget = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO budgets (year_month, limit_amt) VALUES (?1, ?2)
                 ON CONFLICT(year_month) DO UPDATE SET limit_amt = excluded.limit_amt
                 RETURNING id, year_month, limit_amt",
            )?
            .query_row((month, limit), Self::map_row)?;

        Ok(budget)
    }

    /// Retrieve the budget for `month`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no budget has been set for `month`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, month: MonthKey) -> Result<Budget, Error> {
        let budget = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, year_month, limit_amt FROM budgets WHERE year_month = :month")?
            .query_row(&[(":month", &month)], Self::map_row)?;

        Ok(budget)
    }
}

impl CreateTable for SQLiteBudgetStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS budgets (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    year_month TEXT NOT NULL UNIQUE,
                    limit_amt INTEGER NOT NULL CHECK(limit_amt >= 0),
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteBudgetStore {
    type ReturnType = Budget;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let month = row.get(offset + 1)?;
        let limit = row.get(offset + 2)?;

        Ok(Budget::new_unchecked(id, month, limit))
    }
}

#[cfg(test)]
mod sqlite_budget_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use rusqlite::Connection;

    use crate::{Error, db::CreateTable, models::MonthKey, stores::BudgetStore};

    use super::SQLiteBudgetStore;

    fn get_store() -> SQLiteBudgetStore {
        let conn = Connection::open_in_memory().unwrap();
        SQLiteBudgetStore::create_table(&conn).unwrap();

        SQLiteBudgetStore::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn upsert_inserts_on_first_save() {
        let mut store = get_store();
        let march = MonthKey::from_str("2024-03").unwrap();

        let budget = store.upsert(march, 40).unwrap();

        assert!(budget.id() > 0);
        assert_eq!(budget.month(), march);
        assert_eq!(budget.limit(), 40);
    }

    #[test]
    fn upsert_twice_keeps_one_row_and_last_limit_wins() {
        let mut store = get_store();
        let march = MonthKey::from_str("2024-03").unwrap();

        let first = store.upsert(march, 40).unwrap();
        let second = store.upsert(march, 90).unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(second.limit(), 90);
        assert_eq!(store.get(march).unwrap().limit(), 90);
    }

    #[test]
    fn upsert_accepts_zero_limit() {
        let mut store = get_store();
        let march = MonthKey::from_str("2024-03").unwrap();

        let budget = store.upsert(march, 0).unwrap();

        assert_eq!(budget.limit(), 0);
    }

    #[test]
    fn upsert_rejects_negative_limit_at_storage() {
        let mut store = get_store();
        let march = MonthKey::from_str("2024-03").unwrap();

        let result = store.upsert(march, -5);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_fails_when_no_budget_set() {
        let store = get_store();
        let march = MonthKey::from_str("2024-03").unwrap();

        assert_eq!(store.get(march), Err(Error::NotFound));
    }

    #[test]
    fn budgets_for_different_months_do_not_collide() {
        let mut store = get_store();
        let march = MonthKey::from_str("2024-03").unwrap();
        let april = MonthKey::from_str("2024-04").unwrap();

        store.upsert(march, 40).unwrap();
        store.upsert(april, 80).unwrap();

        assert_eq!(store.get(march).unwrap().limit(), 40);
        assert_eq!(store.get(april).unwrap().limit(), 80);
    }
}
