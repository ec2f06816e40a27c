//! Route handlers for creating, listing, updating, and deleting transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    db::{Insert, SelectBy, date_or_now},
    filters::{TransactionFilter, apply_filter},
    models::{DatabaseID, NewTransaction, Transaction, TransactionType},
};

/// The data a client submits to create or update a transaction.
#[derive(Debug, Deserialize)]
pub(crate) struct TransactionData {
    account_id: DatabaseID,
    category_id: DatabaseID,
    amount: f64,
    /// Defaults to the current instant when omitted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    date: Option<OffsetDateTime>,
    note: Option<String>,
    #[serde(rename = "type")]
    kind: TransactionType,
}

impl TransactionData {
    fn into_new_transaction(self, claims: &Claims) -> Result<NewTransaction, Error> {
        NewTransaction::new(
            self.account_id,
            self.category_id,
            claims.user_id(),
            self.amount,
            date_or_now(self.date),
            self.note,
            self.kind,
        )
    }
}

/// A route handler for listing the authenticated user's transactions.
///
/// Query parameters `type`, `category_id`, and `period` restrict the list;
/// all present filters apply together and the result is sorted newest first.
pub(crate) async fn get_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let transactions = {
        let connection = state.db_connection().lock().unwrap();
        Transaction::select(claims.user_id(), &connection)?
    };

    let today = OffsetDateTime::now_utc().date();

    Ok(Json(apply_filter(transactions, &filter, today)))
}

/// A route handler for creating a new transaction.
///
/// A zero or negative amount is rejected with a 400 response before anything
/// is written. On success the referenced account's balance is adjusted in the
/// same database transaction as the insert.
pub(crate) async fn create_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<TransactionData>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let new_transaction = data.into_new_transaction(&claims)?;

    let connection = state.db_connection().lock().unwrap();
    let transaction = new_transaction.insert(&connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for updating a transaction.
///
/// The account balance is not re-adjusted; only creation moves balances.
pub(crate) async fn update_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error> {
    let new_transaction = data.into_new_transaction(&claims)?;

    let connection = state.db_connection().lock().unwrap();
    let transaction = Transaction::update(transaction_id, new_transaction, &connection)?;

    Ok(Json(transaction))
}

/// A route handler for deleting a transaction.
pub(crate) async fn delete_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection().lock().unwrap();
    Transaction::delete(transaction_id, claims.user_id(), &connection)?;

    Ok(Json(json!({ "message": "transaction deleted" })))
}

#[cfg(test)]
mod transaction_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        models::{Account, Category, Transaction, TransactionType},
        routes::test_utils::{register_test_user, test_server},
    };

    async fn create_account(server: &TestServer, token: &str, balance: f64) -> Account {
        server
            .post("/accounts")
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({ "name": "Wallet", "balance": balance }))
            .await
            .json::<Account>()
    }

    async fn first_category(server: &TestServer, token: &str) -> Category {
        server
            .get("/categories")
            .authorization_bearer(token)
            .await
            .json::<Vec<Category>>()
            .remove(0)
    }

    #[tokio::test]
    async fn create_transaction_succeeds() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;

        let response = server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 25.0,
                "date": "2024-03-05T12:00:00Z",
                "note": "Groceries",
                "type": "EXPENSE",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.amount(), 25.0);
        assert_eq!(transaction.note(), Some("Groceries"));
        assert_eq!(transaction.kind(), TransactionType::Expense);
        assert_eq!(transaction.user_id(), login.user.id);
    }

    #[tokio::test]
    async fn create_expense_decrements_account_balance() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;

        server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 25.0,
                "type": "EXPENSE",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let accounts = server
            .get("/accounts")
            .authorization_bearer(&login.token)
            .await
            .json::<Vec<Account>>();
        assert_eq!(accounts[0].balance(), 75.0);
    }

    #[tokio::test]
    async fn create_income_increments_account_balance() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;

        server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 50.0,
                "type": "INCOME",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let accounts = server
            .get("/accounts")
            .authorization_bearer(&login.token)
            .await
            .json::<Vec<Account>>();
        assert_eq!(accounts[0].balance(), 150.0);
    }

    #[tokio::test]
    async fn create_transaction_rejects_non_positive_amounts() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;

        for amount in [-10.0, 0.0] {
            server
                .post("/transactions")
                .authorization_bearer(&login.token)
                .content_type("application/json")
                .json(&json!({
                    "account_id": account.id(),
                    "category_id": category.id(),
                    "amount": amount,
                    "type": "EXPENSE",
                }))
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }

        // No row may be written and no balance moved by a rejected create.
        let transactions = server
            .get("/transactions")
            .authorization_bearer(&login.token)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 0);

        let accounts = server
            .get("/accounts")
            .authorization_bearer(&login.token)
            .await
            .json::<Vec<Account>>();
        assert_eq!(accounts[0].balance(), 100.0);
    }

    #[tokio::test]
    async fn create_transaction_fails_on_someone_elses_account() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let other_login = register_test_user(&server, "other@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;

        server
            .post("/transactions")
            .authorization_bearer(&other_login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 25.0,
                "type": "EXPENSE",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_transactions_sorts_newest_first() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;

        for (amount, date) in [
            (10.0, "2024-03-05T12:00:00Z"),
            (30.0, "2024-03-20T12:00:00Z"),
            (20.0, "2024-03-10T12:00:00Z"),
        ] {
            server
                .post("/transactions")
                .authorization_bearer(&login.token)
                .content_type("application/json")
                .json(&json!({
                    "account_id": account.id(),
                    "category_id": category.id(),
                    "amount": amount,
                    "date": date,
                    "type": "EXPENSE",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let transactions = server
            .get("/transactions")
            .authorization_bearer(&login.token)
            .await
            .json::<Vec<Transaction>>();

        let amounts: Vec<f64> = transactions.iter().map(Transaction::amount).collect();
        assert_eq!(amounts, vec![30.0, 20.0, 10.0]);
    }

    #[tokio::test]
    async fn get_transactions_applies_type_and_category_filters() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let categories = server
            .get("/categories")
            .authorization_bearer(&login.token)
            .await
            .json::<Vec<Category>>();

        server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": categories[0].id(),
                "amount": 25.0,
                "type": "EXPENSE",
            }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": categories[1].id(),
                "amount": 500.0,
                "type": "INCOME",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get("/transactions")
            .add_query_param("type", "INCOME")
            .authorization_bearer(&login.token)
            .await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].kind(), TransactionType::Income);

        let response = server
            .get("/transactions")
            .add_query_param("category_id", categories[0].id())
            .authorization_bearer(&login.token)
            .await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category_id(), categories[0].id());
    }

    #[tokio::test]
    async fn update_transaction_succeeds() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;
        let transaction = server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 25.0,
                "type": "EXPENSE",
            }))
            .await
            .json::<Transaction>();

        let response = server
            .put(&format!("/transactions/{}", transaction.id()))
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 40.0,
                "note": "Corrected",
                "type": "EXPENSE",
            }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Transaction>();
        assert_eq!(updated.id(), transaction.id());
        assert_eq!(updated.amount(), 40.0);
        assert_eq!(updated.note(), Some("Corrected"));
    }

    #[tokio::test]
    async fn update_transaction_rejects_non_positive_amount() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;
        let transaction = server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 25.0,
                "type": "EXPENSE",
            }))
            .await
            .json::<Transaction>();

        server
            .put(&format!("/transactions/{}", transaction.id()))
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": -1.0,
                "type": "EXPENSE",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_transaction_fails_on_someone_elses_transaction() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let other_login = register_test_user(&server, "other@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;
        let transaction = server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 25.0,
                "type": "EXPENSE",
            }))
            .await
            .json::<Transaction>();

        server
            .delete(&format!("/transactions/{}", transaction.id()))
            .authorization_bearer(&other_login.token)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_transaction_succeeds() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token, 100.0).await;
        let category = first_category(&server, &login.token).await;
        let transaction = server
            .post("/transactions")
            .authorization_bearer(&login.token)
            .content_type("application/json")
            .json(&json!({
                "account_id": account.id(),
                "category_id": category.id(),
                "amount": 25.0,
                "type": "EXPENSE",
            }))
            .await
            .json::<Transaction>();

        server
            .delete(&format!("/transactions/{}", transaction.id()))
            .authorization_bearer(&login.token)
            .await
            .assert_status_ok();

        let transactions = server
            .get("/transactions")
            .authorization_bearer(&login.token)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 0);
    }
}
