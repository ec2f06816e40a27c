//! Statistics aggregation: category breakdowns, time-bucketed income/expense
//! series, and totals over a reporting window.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    models::{Category, DatabaseID, Transaction, TransactionType},
    report::period::{Period, last_day_of_month, period_bounds},
};

/// How many categories the top-categories view exposes.
pub const TOP_CATEGORY_COUNT: usize = 5;

/// One expense category's share of the total expense in a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    /// The category the expenses belong to.
    pub category: Category,
    /// The total of the category's expenses in the window.
    pub amount: f64,
    /// `amount` as a percentage of the window's total expense.
    pub percentage: f64,
}

/// Income and expense sums for one time bucket of the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    /// The display label for the bucket, e.g. "Mon", "15", "Mar".
    pub label: String,
    /// The sum of income in the bucket.
    pub income: f64,
    /// The sum of expenses in the bucket.
    pub expense: f64,
}

/// Income, expense, and net totals over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income in the window.
    pub income: f64,
    /// The sum of all expenses in the window.
    pub expense: f64,
    /// `income - expense`.
    pub difference: f64,
}

/// The aggregated statistics for one reporting window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// The window kind the statistics were computed for.
    pub period: Period,
    /// Per-category expense shares, sorted descending by amount.
    pub category_breakdown: Vec<CategoryExpense>,
    /// The first [TOP_CATEGORY_COUNT] entries of the breakdown.
    pub top_categories: Vec<CategoryExpense>,
    /// Income/expense sums bucketed by weekday, day of month, or month.
    pub series: Vec<PeriodBucket>,
    /// Income, expense, and net totals for the window.
    pub totals: Totals,
}

/// Compute the statistics for the window of `period` anchored at `reference`.
///
/// The whole result is recomputed from scratch on every call; there is no
/// incremental update. The function reads only its arguments, so the caller
/// decides what "now" means by picking `reference`.
pub fn statistics(
    transactions: &[Transaction],
    categories: &[Category],
    period: Period,
    reference: Date,
) -> Statistics {
    let window = period_bounds(period, reference);
    let filtered: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| window.contains(transaction.date()))
        .collect();

    let category_breakdown = category_breakdown(&filtered, categories);
    let top_categories = category_breakdown
        .iter()
        .take(TOP_CATEGORY_COUNT)
        .cloned()
        .collect();

    let series = match period {
        Period::Week => week_series(&filtered),
        Period::Month => month_series(&filtered, reference),
        Period::Year => year_series(&filtered),
    };

    let income = sum_by_type(&filtered, TransactionType::Income);
    let expense = sum_by_type(&filtered, TransactionType::Expense);

    Statistics {
        period,
        category_breakdown,
        top_categories,
        series,
        totals: Totals {
            income,
            expense,
            difference: income - expense,
        },
    }
}

/// Group the expenses in `transactions` by category and compute each group's
/// share of the total expense.
///
/// Returns an empty vector when there are no expenses, so percentages are
/// never computed against a zero total.
fn category_breakdown(
    transactions: &[&Transaction],
    categories: &[Category],
) -> Vec<CategoryExpense> {
    let expenses: Vec<&&Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.kind() == TransactionType::Expense)
        .collect();
    let total_expense: f64 = expenses.iter().map(|transaction| transaction.amount()).sum();

    if total_expense == 0.0 {
        return Vec::new();
    }

    let mut totals_by_category: HashMap<DatabaseID, f64> = HashMap::new();
    for transaction in &expenses {
        *totals_by_category
            .entry(transaction.category_id())
            .or_insert(0.0) += transaction.amount();
    }

    let mut breakdown: Vec<CategoryExpense> = totals_by_category
        .into_iter()
        .map(|(category_id, amount)| {
            let category = categories
                .iter()
                .find(|category| category.id() == category_id)
                .cloned()
                .unwrap_or_else(|| Category::unknown(category_id));

            CategoryExpense {
                category,
                amount,
                percentage: amount / total_expense * 100.0,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    breakdown
}

/// One bucket per weekday, Monday through Sunday.
///
/// Transactions land in the bucket whose weekday matches their date's
/// weekday. Membership is a calendar-field match over the window-filtered
/// transactions, not a second date-range check.
fn week_series(transactions: &[&Transaction]) -> Vec<PeriodBucket> {
    const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| {
            bucket(label, transactions, |transaction| {
                transaction.date().weekday().number_from_monday() as usize == index + 1
            })
        })
        .collect()
}

/// One bucket per calendar day of the reference month.
fn month_series(transactions: &[&Transaction], reference: Date) -> Vec<PeriodBucket> {
    let days_in_month = last_day_of_month(reference.year(), reference.month());

    (1..=days_in_month)
        .map(|day| {
            bucket(&day.to_string(), transactions, |transaction| {
                transaction.date().day() == day
            })
        })
        .collect()
}

/// One bucket per calendar month, January through December.
fn year_series(transactions: &[&Transaction]) -> Vec<PeriodBucket> {
    const MONTH_LABELS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| {
            bucket(label, transactions, |transaction| {
                u8::from(transaction.date().month()) as usize == index + 1
            })
        })
        .collect()
}

fn bucket(
    label: &str,
    transactions: &[&Transaction],
    matches: impl Fn(&Transaction) -> bool,
) -> PeriodBucket {
    let mut income = 0.0;
    let mut expense = 0.0;

    for transaction in transactions {
        if !matches(transaction) {
            continue;
        }

        match transaction.kind() {
            TransactionType::Income => income += transaction.amount(),
            TransactionType::Expense => expense += transaction.amount(),
        }
    }

    PeriodBucket {
        label: label.to_string(),
        income,
        expense,
    }
}

fn sum_by_type(transactions: &[&Transaction], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind() == kind)
        .map(|transaction| transaction.amount())
        .sum()
}
