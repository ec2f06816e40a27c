//! Route handler for the statistics report.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    db::SelectBy,
    models::{Category, Transaction},
    report::{Period, Statistics, statistics},
};

/// The query parameters accepted by the statistics endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct StatisticsQuery {
    /// The reporting window; defaults to the current month.
    period: Option<Period>,
}

/// A route handler for the authenticated user's statistics over the selected
/// period, anchored at today.
pub(crate) async fn get_statistics(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<Statistics>, Error> {
    let period = query.period.unwrap_or(Period::Month);

    let (transactions, categories) = {
        let connection = state.db_connection().lock().unwrap();
        (
            Transaction::select(claims.user_id(), &connection)?,
            Category::select_all(&connection)?,
        )
    };

    let today = OffsetDateTime::now_utc().date();

    Ok(Json(statistics(&transactions, &categories, period, today)))
}

#[cfg(test)]
mod statistics_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    use crate::{
        models::{Account, Category},
        routes::test_utils::{register_test_user, test_server},
    };

    async fn create_account(server: &TestServer, token: &str) -> Account {
        server
            .post("/accounts")
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({ "name": "Wallet", "balance": 1000.0 }))
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
    async fn statistics_totals_partition_into_income_minus_expense() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;
        let account = create_account(&server, &login.token).await;
        let category = first_category(&server, &login.token).await;

        // Dated now so the transactions fall in the current month window.
        let now = OffsetDateTime::now_utc().format(&Rfc3339).unwrap();
        for (amount, kind) in [(100.0, "EXPENSE"), (50.0, "EXPENSE"), (500.0, "INCOME")] {
            server
                .post("/transactions")
                .authorization_bearer(&login.token)
                .content_type("application/json")
                .json(&json!({
                    "account_id": account.id(),
                    "category_id": category.id(),
                    "amount": amount,
                    "date": now,
                    "type": kind,
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/statistics")
            .add_query_param("period", "month")
            .authorization_bearer(&login.token)
            .await;

        response.assert_status_ok();

        let stats = response.json::<Value>();
        assert_eq!(stats["period"], json!("month"));
        assert_eq!(stats["totals"]["income"], json!(500.0));
        assert_eq!(stats["totals"]["expense"], json!(150.0));
        assert_eq!(stats["totals"]["difference"], json!(350.0));

        let breakdown = stats["category_breakdown"].as_array().unwrap();
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0]["amount"], json!(150.0));
        assert_eq!(breakdown[0]["percentage"], json!(100.0));
    }

    #[tokio::test]
    async fn statistics_period_defaults_to_month() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;

        let response = server
            .get("/statistics")
            .authorization_bearer(&login.token)
            .await;

        response.assert_status_ok();

        let stats = response.json::<Value>();
        assert_eq!(stats["period"], json!("month"));
    }

    #[tokio::test]
    async fn statistics_with_no_transactions_give_zero_totals() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;

        let response = server
            .get("/statistics")
            .add_query_param("period", "year")
            .authorization_bearer(&login.token)
            .await;

        response.assert_status_ok();

        let stats = response.json::<Value>();
        assert_eq!(stats["totals"]["income"], json!(0.0));
        assert_eq!(stats["totals"]["expense"], json!(0.0));
        assert_eq!(stats["category_breakdown"].as_array().unwrap().len(), 0);
        assert_eq!(stats["series"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn statistics_week_series_has_seven_buckets() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;

        let response = server
            .get("/statistics")
            .add_query_param("period", "week")
            .authorization_bearer(&login.token)
            .await;

        response.assert_status_ok();

        let stats = response.json::<Value>();
        let series = stats["series"].as_array().unwrap();
        assert_eq!(series.len(), 7);
        assert_eq!(series[0]["label"], json!("Mon"));
        assert_eq!(series[6]["label"], json!("Sun"));
    }

    #[tokio::test]
    async fn statistics_rejects_unknown_period() {
        let server = test_server();
        let login = register_test_user(&server, "test@test.com").await;

        server
            .get("/statistics")
            .add_query_param("period", "fortnight")
            .authorization_bearer(&login.token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn statistics_fails_without_token() {
        let server = test_server();

        server
            .get("/statistics")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
