//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token in the request is missing, malformed, or expired.
    #[error("invalid auth token")]
    InvalidToken,

    /// An auth token could not be created for a signed-in user.
    #[error("could not create auth token")]
    TokenCreation,

    /// The email used to register already belongs to another user.
    #[error("the email is already in use")]
    EmailTaken,

    /// The string used to register is not a well-formed email address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// A blank string was used for a required name field.
    #[error("name cannot be empty")]
    EmptyName,

    /// The password used to register is shorter than the minimum length.
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// A zero or negative amount was used to create a transaction.
    ///
    /// Transactions record money that was spent or earned, so the amount must
    /// be strictly positive. The direction of the money flow is expressed by
    /// the transaction type instead of the sign.
    #[error("transaction amount must be greater than 0, got {0}")]
    NonPositiveAmount(f64),

    /// The account ID used to create a transaction did not match one of the
    /// user's accounts.
    #[error("the account ID does not refer to a valid account")]
    InvalidAccount,

    /// The category ID used to create a transaction or budget did not match a
    /// valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error is replaced
    /// with a generic internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::EmailTaken
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::InvalidCredentials | Error::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            Error::InvalidEmail(_)
            | Error::EmptyName
            | Error::PasswordTooShort(_)
            | Error::NonPositiveAmount(_)
            | Error::InvalidAccount
            | Error::InvalidCategory => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // The remaining errors are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
