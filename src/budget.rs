//! Composes the budget store with the ledger's aggregates to answer the
//! question the whole engine exists for: is this month over budget?

use crate::{
    Error,
    models::{Budget, MonthKey},
    stores::{BudgetStore, TransactionStore},
};

/// Tracks monthly spending limits against the ledger's expense totals.
#[derive(Debug, Clone)]
pub struct BudgetTracker<B, T>
where
    B: BudgetStore,
    T: TransactionStore,
{
    budget_store: B,
    transaction_store: T,
}

impl<B, T> BudgetTracker<B, T>
where
    B: BudgetStore,
    T: TransactionStore,
{
    /// Create a tracker over the given stores.
    ///
    /// The SQLite stores are cheap handle clones, so the tracker can share
    /// stores with an [AppState](crate::AppState).
    pub fn new(budget_store: B, transaction_store: T) -> Self {
        Self {
            budget_store,
            transaction_store,
        }
    }

    /// Save the spending limit for `month`.
    ///
    /// The first save for a month creates the budget; later saves update
    /// the limit in place. There is never more than one budget per month.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn save_monthly_budget(&mut self, month: MonthKey, limit: i64) -> Result<Budget, Error> {
        self.budget_store.upsert(month, limit)
    }

    /// Whether the expenses of `month` strictly exceed its budget limit.
    ///
    /// A month with no budget set is never over budget, and spending
    /// exactly the limit is not over budget either.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn is_over_budget(&self, month: MonthKey) -> Result<bool, Error> {
        let budget = match self.budget_store.get(month) {
            Ok(budget) => budget,
            Err(Error::NotFound) => return Ok(false),
            Err(error) => return Err(error),
        };

        let used = self.transaction_store.total_expense_of_month(month)?;

        Ok(used > budget.limit())
    }

    /// The limit set for `month`, or `None` when no budget has been set.
    ///
    /// `None` is distinct from a limit of zero, which is a valid budget.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn budget_limit(&self, month: MonthKey) -> Result<Option<i64>, Error> {
        match self.budget_store.get(month) {
            Ok(budget) => Ok(Some(budget.limit())),
            Err(Error::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// The total expenses recorded for `month`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn used_expense_of_month(&self, month: MonthKey) -> Result<i64, Error> {
        self.transaction_store.total_expense_of_month(month)
    }
}
