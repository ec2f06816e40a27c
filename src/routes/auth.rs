//! Route handlers for registration, sign-in, and the current user.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{Claims, encode_token},
    db::{Insert, SelectBy},
    models::{NewUser, PasswordHash, User, UserID},
};

/// The data a client submits to register a new user.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

/// The data a client submits to sign in.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

/// A user as exposed over the API, i.e. without the password hash.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct UserResponse {
    pub(crate) id: UserID,
    pub(crate) name: String,
    pub(crate) email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// The response to a successful registration or sign-in.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LoginResponse {
    pub(crate) token: String,
    pub(crate) user: UserResponse,
}

/// A route handler for registering a new user.
///
/// Responds with 400 on a blank name, malformed email, or short password, and
/// 409 when the email already belongs to a user.
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), Error> {
    if request.name.trim().is_empty() {
        return Err(Error::EmptyName);
    }

    let email =
        EmailAddress::from_str(&request.email).map_err(|e| Error::InvalidEmail(e.to_string()))?;
    let password_hash =
        PasswordHash::from_raw_password(&request.password, PasswordHash::DEFAULT_COST)?;

    let user = NewUser {
        name: request.name,
        email,
        password_hash,
    }
    .insert(&state.db_connection().lock().unwrap())?;

    let token = encode_token(user.id(), state.encoding_key())?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// A route handler for signing in an existing user.
///
/// Responds with 401 on an unknown email or wrong password. The two cases are
/// indistinguishable to the client.
pub(crate) async fn log_in(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Error> {
    let email = EmailAddress::from_str(&request.email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = state.db_connection().lock().unwrap();
        User::select(&email, &connection).map_err(|e| match e {
            Error::NotFound => Error::InvalidCredentials,
            e => e,
        })?
    };

    let password_is_correct = user.password_hash().verify(&request.password).map_err(|e| {
        tracing::error!("Error verifying password: {e}");
        Error::HashingError(e.to_string())
    })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id(), state.encoding_key())?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// A route handler for fetching the authenticated user.
pub(crate) async fn get_me(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<UserResponse>, Error> {
    let connection = state.db_connection().lock().unwrap();
    let user = User::select(claims.user_id(), &connection)?;

    Ok(Json(user.into()))
}
