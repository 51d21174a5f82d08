//! Defines the transaction store trait, the ledger side of the engine.

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, MonthKey, Transaction, TransactionBuilder, TransactionKind},
};

/// Handles the creation, retrieval and aggregation of transactions.
///
/// All operations are single-shot and synchronous; storage failures
/// propagate as [Error::SqlError] and are never retried.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Delete at most one transaction by its `id`.
    ///
    /// Deleting an id that does not exist is not an error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Retrieve a transaction from the store by its `id`.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve the transactions within the inclusive date range `from..=to`,
    /// ordered by date ascending then id ascending.
    ///
    /// The secondary id ordering is load-bearing: it encodes insertion order
    /// within a day and callers rely on it being stable.
    fn get_by_period(&self, from: Date, to: Date) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions on `date`, ordered by id ascending.
    fn get_by_date(&self, date: Date) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions in `month`, ordered as
    /// [TransactionStore::get_by_period].
    fn get_by_month(&self, month: MonthKey) -> Result<Vec<Transaction>, Error>;

    /// The sum of amounts of `kind` transactions within `from..=to`
    /// (inclusive). An empty result set sums to 0.
    fn total_by_kind(&self, kind: TransactionKind, from: Date, to: Date) -> Result<i64, Error>;

    /// The sum of income amounts in `month`. 0 when there are none.
    fn total_income_of_month(&self, month: MonthKey) -> Result<i64, Error>;

    /// The sum of expense amounts in `month`. 0 when there are none.
    fn total_expense_of_month(&self, month: MonthKey) -> Result<i64, Error>;

    /// The sum of expense amounts on `date`. 0 when there are none.
    fn total_expense_of_day(&self, date: Date) -> Result<i64, Error>;

    /// The total number of transactions in the store.
    fn count(&self) -> Result<usize, Error>;
}
