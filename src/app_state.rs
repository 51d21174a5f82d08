//! Defines the state that bundles the three stores the engine operates on.

use crate::stores::{BudgetStore, TransactionStore, UserStore};

/// Bundles the stores for transactions, budgets and users.
///
/// The state is the composition root the services and binaries are built
/// from; see [create_app_state](crate::stores::sqlite::create_app_state)
/// for the SQLite-backed constructor.
#[derive(Debug, Clone)]
pub struct AppState<T, B, U>
where
    T: TransactionStore,
    B: BudgetStore,
    U: UserStore,
{
    /// The store for income/expense transactions.
    pub transaction_store: T,
    /// The store for monthly budget limits.
    pub budget_store: B,
    /// The store for registered accounts.
    pub user_store: U,
}

impl<T, B, U> AppState<T, B, U>
where
    T: TransactionStore,
    B: BudgetStore,
    U: UserStore,
{
    /// Create the app state from its stores.
    pub fn new(transaction_store: T, budget_store: B, user_store: U) -> Self {
        Self {
            transaction_store,
            budget_store,
            user_store,
        }
    }
}
