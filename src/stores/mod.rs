//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).

mod budget;
mod transaction;
mod user;

pub mod sqlite;

pub use budget::BudgetStore;
pub use transaction::TransactionStore;
pub use user::UserStore;
