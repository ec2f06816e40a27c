//! Route handlers for listing categories.
//!
//! Categories are seeded reference data shared by all users, so the API only
//! exposes reads.

use axum::{Json, extract::State};

use crate::{AppState, Error, auth::Claims, models::Category};

/// A route handler for listing all categories.
pub(crate) async fn get_categories(
    State(state): State<AppState>,
    _claims: Claims,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.db_connection().lock().unwrap();
    let categories = Category::select_all(&connection)?;

    Ok(Json(categories))
}
