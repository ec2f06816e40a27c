//! Application router configuration.
//!
//! Everything outside `/auth/register` and `/auth/login` requires a bearer
//! token; protection comes from handlers taking a
//! [Claims](crate::auth::Claims) argument rather than from a middleware
//! layer.

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::AppState;

mod account;
mod auth;
mod budget;
mod category;
mod statistics;
mod transaction;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::log_in))
        .route("/auth/me", get(auth::get_me))
        .route(
            "/accounts",
            get(account::get_accounts).post(account::create_account),
        )
        .route(
            "/accounts/{account_id}",
            put(account::update_account).delete(account::delete_account),
        )
        .route("/categories", get(category::get_categories))
        .route(
            "/transactions",
            get(transaction::get_transactions).post(transaction::create_transaction),
        )
        .route(
            "/transactions/{transaction_id}",
            put(transaction::update_transaction).delete(transaction::delete_transaction),
        )
        .route(
            "/budgets",
            get(budget::get_budgets).post(budget::create_budget),
        )
        .route("/budgets/usage", get(budget::get_budget_usage))
        .route(
            "/budgets/{budget_id}",
            put(budget::update_budget).delete(budget::delete_budget),
        )
        .route("/statistics", get(statistics::get_statistics))
        .with_state(state)
}

async fn get_health() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}
