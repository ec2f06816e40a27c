//! The aggregation engine: period resolution, budget consumption, and
//! statistics.
//!
//! Everything in this module is a pure function over in-memory slices. The
//! reference date is always an explicit argument so results are deterministic
//! and the functions can be tested without touching a clock or a database.

pub use budget::{BudgetUsage, budget_usage};
pub use period::{DateTimeRange, Period, period_bounds, previous_month};
pub use statistics::{
    CategoryExpense, PeriodBucket, Statistics, TOP_CATEGORY_COUNT, Totals, statistics,
};

mod budget;
mod period;
mod statistics;
