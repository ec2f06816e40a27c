//! Combinable filters for the transaction list.

use serde::Deserialize;
use time::Date;

use crate::{
    models::{DatabaseID, Transaction, TransactionType},
    report::{Period, period_bounds, previous_month},
};

/// The date window preset to restrict the transaction list to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodFilter {
    /// No date restriction.
    #[default]
    All,
    /// The week containing the reference date.
    ThisWeek,
    /// The month containing the reference date.
    ThisMonth,
    /// The calendar month before the one containing the reference date.
    LastMonth,
}

/// The filters a client can apply to the transaction list.
///
/// Every field is optional and all present filters apply together.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransactionFilter {
    /// Keep only transactions of this type.
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// Keep only transactions in this category.
    pub category_id: Option<DatabaseID>,
    /// Keep only transactions inside this date window.
    #[serde(default)]
    pub period: PeriodFilter,
}

/// Apply `filter` to `transactions` and sort the result newest first.
///
/// Date windows are resolved against `reference`, which callers typically set
/// to today.
pub fn apply_filter(
    transactions: Vec<Transaction>,
    filter: &TransactionFilter,
    reference: Date,
) -> Vec<Transaction> {
    let window = match filter.period {
        PeriodFilter::All => None,
        PeriodFilter::ThisWeek => Some(period_bounds(Period::Week, reference)),
        PeriodFilter::ThisMonth => Some(period_bounds(Period::Month, reference)),
        PeriodFilter::LastMonth => {
            Some(period_bounds(Period::Month, previous_month(reference)))
        }
    };

    let mut filtered: Vec<Transaction> = transactions
        .into_iter()
        .filter(|transaction| {
            filter
                .kind
                .is_none_or(|kind| transaction.kind() == kind)
        })
        .filter(|transaction| {
            filter
                .category_id
                .is_none_or(|category_id| transaction.category_id() == category_id)
        })
        .filter(|transaction| {
            window
                .as_ref()
                .is_none_or(|window| window.contains(transaction.date()))
        })
        .collect();

    filtered.sort_by(|a, b| b.date().cmp(&a.date()));

    filtered
}

#[cfg(test)]
mod apply_filter_tests {
    use time::{
        OffsetDateTime,
        macros::{date, datetime},
    };

    use crate::models::{Transaction, TransactionType, UserID};

    use super::{PeriodFilter, TransactionFilter, apply_filter};

    fn transaction(
        id: i64,
        category_id: i64,
        date: OffsetDateTime,
        kind: TransactionType,
    ) -> Transaction {
        Transaction::new_unchecked(id, 1, category_id, UserID::new(1), 10.0, date, None, kind)
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            transaction(
                1,
                1,
                datetime!(2024-03-05 12:00 UTC),
                TransactionType::Expense,
            ),
            transaction(
                2,
                2,
                datetime!(2024-03-06 12:00 UTC),
                TransactionType::Income,
            ),
            transaction(
                3,
                1,
                datetime!(2024-02-10 12:00 UTC),
                TransactionType::Expense,
            ),
            transaction(
                4,
                2,
                datetime!(2023-11-20 12:00 UTC),
                TransactionType::Expense,
            ),
        ]
    }

    #[test]
    fn no_filters_return_everything_sorted_newest_first() {
        let result = apply_filter(
            sample_transactions(),
            &TransactionFilter::default(),
            date!(2024 - 03 - 15),
        );

        let ids: Vec<i64> = result.iter().map(Transaction::id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn type_filter_keeps_only_matching_transactions() {
        let filter = TransactionFilter {
            kind: Some(TransactionType::Income),
            ..Default::default()
        };

        let result = apply_filter(sample_transactions(), &filter, date!(2024 - 03 - 15));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id(), 2);
    }

    #[test]
    fn filters_combine_with_and_semantics() {
        let filter = TransactionFilter {
            kind: Some(TransactionType::Expense),
            category_id: Some(1),
            period: PeriodFilter::ThisMonth,
        };

        let result = apply_filter(sample_transactions(), &filter, date!(2024 - 03 - 15));

        let ids: Vec<i64> = result.iter().map(Transaction::id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn this_week_filter_uses_the_reference_week() {
        let filter = TransactionFilter {
            period: PeriodFilter::ThisWeek,
            ..Default::default()
        };

        // The week of 2024-03-06 runs 2024-03-04 through 2024-03-10.
        let result = apply_filter(sample_transactions(), &filter, date!(2024 - 03 - 06));

        let ids: Vec<i64> = result.iter().map(Transaction::id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn last_month_filter_uses_the_previous_calendar_month() {
        let filter = TransactionFilter {
            period: PeriodFilter::LastMonth,
            ..Default::default()
        };

        let result = apply_filter(sample_transactions(), &filter, date!(2024 - 03 - 15));

        let ids: Vec<i64> = result.iter().map(Transaction::id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn last_month_filter_rolls_over_year_boundary() {
        let transactions = vec![
            transaction(
                1,
                1,
                datetime!(2023-12-15 12:00 UTC),
                TransactionType::Expense,
            ),
            transaction(
                2,
                1,
                datetime!(2024-01-15 12:00 UTC),
                TransactionType::Expense,
            ),
        ];
        let filter = TransactionFilter {
            period: PeriodFilter::LastMonth,
            ..Default::default()
        };

        let result = apply_filter(transactions, &filter, date!(2024 - 01 - 20));

        let ids: Vec<i64> = result.iter().map(Transaction::id).collect();
        assert_eq!(ids, vec![1]);
    }
}
