//! This file defines the type `Transaction`, the core type of the ledger,
//! and the closed `TransactionKind` enum that replaces free-text kinds.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, models::DatabaseID};

/// Whether a transaction brought money in or took money out.
///
/// The kind is parsed once at the boundary via [TransactionKind::from_str];
/// downstream code never re-validates kind strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The kind as the text stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::InvalidTransactionKind(other.to_string())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// An income or expense record, i.e. an event where money was either earned
/// or spent.
///
/// To create a new `Transaction`, use [Transaction::build]. Transactions are
/// immutable once stored; the only lifecycle operations are insert and
/// delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    kind: TransactionKind,
    date: Date,
    category: String,
    amount: i64,
    memo: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    pub fn build(kind: TransactionKind, amount: i64) -> TransactionBuilder {
        TransactionBuilder::new(kind, amount)
    }

    /// Create a transaction from parts that are already known to be valid,
    /// e.g. a row from the database.
    pub fn new_unchecked(
        id: DatabaseID,
        kind: TransactionKind,
        date: Date,
        category: String,
        amount: i64,
        memo: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            date,
            category,
            amount,
            memo,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// Whether the transaction is an income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The calendar day the transaction happened.
    pub fn date(&self) -> &Date {
        &self.date
    }

    /// The free-form category the transaction belongs to, e.g. "Groceries".
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The amount of money earned or spent, in minor-unit-free integers.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// An optional note attached to the transaction.
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }
}

/// Builder for creating a new [Transaction].
///
/// The date defaults to today. Finalize the builder with
/// [TransactionStore::create](crate::stores::TransactionStore::create).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// Whether the new transaction is an income or an expense.
    pub kind: TransactionKind,
    /// The calendar day the new transaction happened.
    pub date: Date,
    /// The category the new transaction belongs to.
    pub category: String,
    /// The amount of money earned or spent.
    pub amount: i64,
    /// An optional note.
    pub memo: Option<String>,
}

impl TransactionBuilder {
    /// Create a builder for a transaction of `kind` worth `amount`.
    pub fn new(kind: TransactionKind, amount: i64) -> Self {
        Self {
            kind,
            date: OffsetDateTime::now_utc().date(),
            category: String::new(),
            amount,
            memo: None,
        }
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Set the memo for the transaction.
    pub fn memo(mut self, memo: Option<&str>) -> Self {
        self.memo = memo.map(str::to_string);
        self
    }
}
