//! Budget consumption: how much of a budget's limit has been spent in its
//! current period.

use serde::Serialize;

use crate::{
    models::{Budget, Category, Transaction, TransactionType},
    report::period::period_bounds,
};

/// A budget together with its consumption over its current period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    /// The budget being measured.
    pub budget: Budget,
    /// The category the budget limits.
    pub category: Category,
    /// The total of matching expenses inside the budget's window.
    pub spent: f64,
    /// `spent` as a percentage of the budget's limit. Zero when the limit is
    /// zero or negative.
    pub percentage: f64,
    /// Whether `spent` is strictly greater than the limit.
    pub is_exceeded: bool,
}

/// Measure how much of `budget` has been consumed by `transactions`.
///
/// Only expenses in the budget's category that fall inside the window anchored
/// at the budget's start date count towards `spent`. A budget whose category
/// no longer exists resolves to the placeholder category instead of failing.
///
/// The result is deterministic for identical inputs and the function has no
/// side effects.
pub fn budget_usage(
    budget: &Budget,
    transactions: &[Transaction],
    categories: &[Category],
) -> BudgetUsage {
    let category = categories
        .iter()
        .find(|category| category.id() == budget.category_id())
        .cloned()
        .unwrap_or_else(|| Category::unknown(budget.category_id()));

    let window = period_bounds(budget.period().into(), budget.start_date().date());

    let spent: f64 = transactions
        .iter()
        .filter(|transaction| transaction.category_id() == budget.category_id())
        .filter(|transaction| transaction.kind() == TransactionType::Expense)
        .filter(|transaction| window.contains(transaction.date()))
        .map(Transaction::amount)
        .sum();

    let percentage = if budget.amount() > 0.0 {
        spent / budget.amount() * 100.0
    } else {
        0.0
    };

    BudgetUsage {
        spent,
        percentage,
        is_exceeded: spent > budget.amount(),
        category,
        budget: budget.clone(),
    }
}
