//! Route handlers for creating, listing, updating, and deleting accounts.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::Claims,
    db::{Insert, SelectBy},
    models::{Account, AccountType, DatabaseID, NewAccount},
};

/// The data a client submits to create or update an account.
#[derive(Debug, Deserialize)]
pub(crate) struct AccountData {
    name: String,
    #[serde(default)]
    balance: f64,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default, rename = "type")]
    kind: AccountType,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A route handler for listing the authenticated user's accounts.
pub(crate) async fn get_accounts(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = state.db_connection().lock().unwrap();
    let accounts = Account::select(claims.user_id(), &connection)?;

    Ok(Json(accounts))
}

/// A route handler for creating a new account.
pub(crate) async fn create_account(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<AccountData>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let connection = state.db_connection().lock().unwrap();
    let account = NewAccount {
        user_id: claims.user_id(),
        name: data.name,
        balance: data.balance,
        currency: data.currency,
        kind: data.kind,
    }
    .insert(&connection)?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// A route handler for updating an account.
///
/// Responds with 404 when the account does not exist or belongs to another
/// user, so clients cannot probe for other users' resources.
pub(crate) async fn update_account(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<DatabaseID>,
    Json(data): Json<AccountData>,
) -> Result<Json<Account>, Error> {
    let connection = state.db_connection().lock().unwrap();
    let account = Account::update(
        account_id,
        NewAccount {
            user_id: claims.user_id(),
            name: data.name,
            balance: data.balance,
            currency: data.currency,
            kind: data.kind,
        },
        &connection,
    )?;

    Ok(Json(account))
}

/// A route handler for deleting an account and, through the schema's cascade,
/// its transactions.
pub(crate) async fn delete_account(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection().lock().unwrap();
    Account::delete(account_id, claims.user_id(), &connection)?;

    Ok(Json(json!({ "message": "account deleted" })))
}
