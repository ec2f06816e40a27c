//! This file defines the `Budget` type, a recurring spending ceiling for one
//! category of expenses.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{DatabaseID, UserID};

/// The recurrence unit anchoring a budget's spending limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPeriod {
    /// The calendar week (Monday through Sunday) containing the start date.
    Week,
    /// The calendar month containing the start date.
    #[default]
    Month,
    /// The calendar year containing the start date.
    Year,
}

impl BudgetPeriod {
    /// The string stored in the database for this budget period.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
        }
    }
}

impl ToSql for BudgetPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for BudgetPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|period| match period {
            "WEEK" => Ok(Self::Week),
            "MONTH" => Ok(Self::Month),
            "YEAR" => Ok(Self::Year),
            other => Err(FromSqlError::Other(
                format!("invalid budget period {other}").into(),
            )),
        })
    }
}

/// A spending ceiling for one expense category over a recurring period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    id: DatabaseID,
    user_id: UserID,
    category_id: DatabaseID,
    amount: f64,
    period: BudgetPeriod,
    #[serde(with = "time::serde::rfc3339")]
    start_date: OffsetDateTime,
}

impl Budget {
    /// Create a budget from its parts.
    pub fn new(
        id: DatabaseID,
        user_id: UserID,
        category_id: DatabaseID,
        amount: f64,
        period: BudgetPeriod,
        start_date: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            category_id,
            amount,
            period,
            start_date,
        }
    }

    /// The ID of the budget.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the user that owns the budget.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The ID of the expense category the budget limits.
    pub fn category_id(&self) -> DatabaseID {
        self.category_id
    }

    /// The spending limit for the budget's period.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The recurrence unit of the budget.
    pub fn period(&self) -> BudgetPeriod {
        self.period
    }

    /// The date that anchors the budget's current period.
    pub fn start_date(&self) -> OffsetDateTime {
        self.start_date
    }
}

/// The data needed to create a new [Budget].
///
/// A budget's amount is intentionally not validated: a zero or negative limit
/// is treated as fully consumed by the usage calculation rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The ID of the user that will own the budget.
    pub user_id: UserID,
    /// The ID of the expense category the budget limits.
    pub category_id: DatabaseID,
    /// The spending limit for the budget's period.
    pub amount: f64,
    /// The recurrence unit of the budget.
    pub period: BudgetPeriod,
    /// The date that anchors the budget's current period.
    pub start_date: OffsetDateTime,
}
