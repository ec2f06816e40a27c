//! This file defines the `Category` type.
//! Categories label transactions and budgets, e.g. 'Food', 'Transport', 'Salary'.
//! They are system reference data seeded when the database is created.

use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, TransactionType};

/// A category for expenses and income.
///
/// Each category applies to one transaction direction: expense categories
/// label spending, income categories label earnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    id: DatabaseID,
    name: String,
    #[serde(rename = "type")]
    kind: TransactionType,
    icon: String,
    color: String,
}

impl Category {
    /// Create a new category.
    pub fn new(
        id: DatabaseID,
        name: String,
        kind: TransactionType,
        icon: String,
        color: String,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            icon,
            color,
        }
    }

    /// The placeholder category used when a transaction or budget references a
    /// category that no longer exists.
    pub fn unknown(id: DatabaseID) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            kind: TransactionType::Expense,
            icon: "help".to_string(),
            color: "#999999".to_string(),
        }
    }

    /// The ID of the category.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The name of the category.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the category labels income or expenses.
    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    /// The name of the icon the client should display for the category.
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// The display color of the category as a hex string, e.g. "#FF6B6B".
    pub fn color(&self) -> &str {
        &self.color
    }
}
