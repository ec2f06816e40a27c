//! Route handlers for budgets and budget consumption.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    db::{Insert, SelectBy, date_or_now},
    models::{Budget, BudgetPeriod, Category, DatabaseID, NewBudget, Transaction},
    report::{BudgetUsage, budget_usage},
};

/// The data a client submits to create or update a budget.
#[derive(Debug, Deserialize)]
pub(crate) struct BudgetData {
    category_id: DatabaseID,
    amount: f64,
    #[serde(default)]
    period: BudgetPeriod,
    /// Defaults to the current instant when omitted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    start_date: Option<OffsetDateTime>,
}

impl BudgetData {
    fn into_new_budget(self, claims: &Claims) -> NewBudget {
        NewBudget {
            user_id: claims.user_id(),
            category_id: self.category_id,
            amount: self.amount,
            period: self.period,
            start_date: date_or_now(self.start_date),
        }
    }
}

/// A route handler for listing the authenticated user's budgets.
pub(crate) async fn get_budgets(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Budget>>, Error> {
    let connection = state.db_connection().lock().unwrap();
    let budgets = Budget::select(claims.user_id(), &connection)?;

    Ok(Json(budgets))
}

/// A route handler for creating a new budget.
pub(crate) async fn create_budget(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<BudgetData>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let connection = state.db_connection().lock().unwrap();
    let budget = data.into_new_budget(&claims).insert(&connection)?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// A route handler for updating a budget.
pub(crate) async fn update_budget(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<DatabaseID>,
    Json(data): Json<BudgetData>,
) -> Result<Json<Budget>, Error> {
    let connection = state.db_connection().lock().unwrap();
    let budget = Budget::update(budget_id, data.into_new_budget(&claims), &connection)?;

    Ok(Json(budget))
}

/// A route handler for deleting a budget.
pub(crate) async fn delete_budget(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection().lock().unwrap();
    Budget::delete(budget_id, claims.user_id(), &connection)?;

    Ok(Json(json!({ "message": "budget deleted" })))
}

/// A route handler for the consumption of each of the user's budgets over
/// their current periods.
pub(crate) async fn get_budget_usage(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<BudgetUsage>>, Error> {
    let connection = state.db_connection().lock().unwrap();
    let budgets = Budget::select(claims.user_id(), &connection)?;
    let transactions = Transaction::select(claims.user_id(), &connection)?;
    let categories = Category::select_all(&connection)?;

    let usage = budgets
        .iter()
        .map(|budget| budget_usage(budget, &transactions, &categories))
        .collect();

    Ok(Json(usage))
}
