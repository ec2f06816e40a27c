//! This file defines the `Account` type, a place money is kept and moved
//! in and out of by transactions.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, UserID};

/// The kind of place an account's money is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Physical cash.
    #[default]
    Cash,
    /// A debit or credit card.
    Card,
    /// A bank account.
    Bank,
}

impl AccountType {
    /// The string stored in the database for this account type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Bank => "BANK",
        }
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|kind| match kind {
            "CASH" => Ok(Self::Cash),
            "CARD" => Ok(Self::Card),
            "BANK" => Ok(Self::Bank),
            other => Err(FromSqlError::Other(
                format!("invalid account type {other}").into(),
            )),
        })
    }
}

/// A named pot of money belonging to one user.
///
/// The balance is a running total: it is adjusted whenever a transaction
/// referencing the account is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    id: DatabaseID,
    user_id: UserID,
    name: String,
    balance: f64,
    currency: String,
    #[serde(rename = "type")]
    kind: AccountType,
}

impl Account {
    /// Create an account from its parts.
    pub fn new(
        id: DatabaseID,
        user_id: UserID,
        name: String,
        balance: f64,
        currency: String,
        kind: AccountType,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            balance,
            currency,
            kind,
        }
    }

    /// The ID of the account.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the user that owns the account.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The display name of the account.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current balance of the account.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// The ISO 4217 currency code of the account, e.g. "USD".
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The kind of account.
    pub fn kind(&self) -> AccountType {
        self.kind
    }
}

/// The data needed to create a new [Account].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The ID of the user that will own the account.
    pub user_id: UserID,
    /// The display name of the account.
    pub name: String,
    /// The opening balance of the account.
    pub balance: f64,
    /// The ISO 4217 currency code of the account.
    pub currency: String,
    /// The kind of account.
    pub kind: AccountType,
}
