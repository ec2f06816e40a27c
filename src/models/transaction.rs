//! This file defines the type `Transaction`, the core type of the budgeting part of the
//! application, along with its direction type and validated creation data.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a transaction records money that was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming into an account, e.g. wages.
    Income,
    /// Money leaving an account, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string stored in the database for this transaction type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|kind| match kind {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction type {other}").into(),
            )),
        })
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new transaction, use [NewTransaction], which validates the
/// amount before anything touches the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    account_id: DatabaseID,
    category_id: DatabaseID,
    user_id: UserID,
    amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    note: Option<String>,
    #[serde(rename = "type")]
    kind: TransactionType,
}

impl Transaction {
    /// Create a transaction without validating the amount.
    ///
    /// This is intended for reconstructing transactions that have already
    /// passed validation, e.g. rows read back from the database.
    #[allow(clippy::too_many_arguments)]
    pub fn new_unchecked(
        id: DatabaseID,
        account_id: DatabaseID,
        category_id: DatabaseID,
        user_id: UserID,
        amount: f64,
        date: OffsetDateTime,
        note: Option<String>,
        kind: TransactionType,
    ) -> Self {
        Self {
            id,
            account_id,
            category_id,
            user_id,
            amount,
            date,
            note,
            kind,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the account the money moved in or out of.
    pub fn account_id(&self) -> DatabaseID {
        self.account_id
    }

    /// The ID of the category that describes the transaction.
    pub fn category_id(&self) -> DatabaseID {
        self.category_id
    }

    /// The ID of the user that created this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The amount of money spent or earned in this transaction. Always positive.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// When the transaction happened.
    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    /// A free-form note describing what the transaction was for.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Whether the transaction is income or an expense.
    pub fn kind(&self) -> TransactionType {
        self.kind
    }
}

/// The validated data needed to create a new [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub(crate) account_id: DatabaseID,
    pub(crate) category_id: DatabaseID,
    pub(crate) user_id: UserID,
    pub(crate) amount: f64,
    pub(crate) date: OffsetDateTime,
    pub(crate) note: Option<String>,
    pub(crate) kind: TransactionType,
}

impl NewTransaction {
    /// Validate the data for a new transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::NonPositiveAmount] if `amount` is zero or negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: DatabaseID,
        category_id: DatabaseID,
        user_id: UserID,
        amount: f64,
        date: OffsetDateTime,
        note: Option<String>,
        kind: TransactionType,
    ) -> Result<Self, Error> {
        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount(amount));
        }

        Ok(Self {
            account_id,
            category_id,
            user_id,
            amount,
            date,
            note,
            kind,
        })
    }

    /// The amount applied to the account balance: positive for income,
    /// negative for expenses.
    pub(crate) fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[cfg(test)]
mod new_transaction_tests {
    use time::OffsetDateTime;

    use crate::{
        Error,
        models::{TransactionType, UserID},
    };

    use super::NewTransaction;

    fn build(amount: f64) -> Result<NewTransaction, Error> {
        NewTransaction::new(
            1,
            1,
            UserID::new(1),
            amount,
            OffsetDateTime::now_utc(),
            None,
            TransactionType::Expense,
        )
    }

    #[test]
    fn new_fails_on_zero_amount() {
        assert_eq!(build(0.0), Err(Error::NonPositiveAmount(0.0)));
    }

    #[test]
    fn new_fails_on_negative_amount() {
        assert_eq!(build(-10.0), Err(Error::NonPositiveAmount(-10.0)));
    }

    #[test]
    fn new_succeeds_on_positive_amounts() {
        for amount in [0.01, 1.0, 123.45, 1_000_000.0] {
            assert!(build(amount).is_ok(), "amount {amount} should be accepted");
        }
    }

    #[test]
    fn signed_amount_follows_transaction_type() {
        let income = NewTransaction::new(
            1,
            1,
            UserID::new(1),
            25.0,
            OffsetDateTime::now_utc(),
            None,
            TransactionType::Income,
        )
        .unwrap();
        let expense = NewTransaction::new(
            1,
            1,
            UserID::new(1),
            25.0,
            OffsetDateTime::now_utc(),
            None,
            TransactionType::Expense,
        )
        .unwrap();

        assert_eq!(income.signed_amount(), 25.0);
        assert_eq!(expense.signed_amount(), -25.0);
    }
}
