//! Defines the budget store trait.

use crate::{
    Error,
    models::{Budget, MonthKey},
};

/// Handles the storage of monthly budget limits, one row per month.
pub trait BudgetStore {
    /// Insert a budget for `month`, or update the limit in place if one
    /// already exists.
    ///
    /// Implementers must perform this as a single atomic statement keyed by
    /// the unique month column, so that two overlapping saves for the same
    /// month can never produce two rows or a duplicate-insert failure.
    fn upsert(&mut self, month: MonthKey, limit: i64) -> Result<Budget, Error>;

    /// Retrieve the budget for `month`, or [Error::NotFound] if no budget
    /// has been set for that month.
    fn get(&self, month: MonthKey) -> Result<Budget, Error>;
}
