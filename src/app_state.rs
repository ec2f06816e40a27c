//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The keys used to sign and verify auth tokens.
#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    db_connection: Arc<Mutex<Connection>>,
    jwt_keys: JwtKeys,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the
    /// domain models and seeding the default categories. `jwt_secret` is used
    /// to sign and verify auth tokens.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, jwt_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            jwt_keys: JwtKeys {
                encoding_key: EncodingKey::from_secret(jwt_secret.as_ref()),
                decoding_key: DecodingKey::from_secret(jwt_secret.as_ref()),
            },
        })
    }

    /// The shared database connection.
    pub fn db_connection(&self) -> &Mutex<Connection> {
        &self.db_connection
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }
}

impl<S> FromRequestParts<S> for AppState
where
    Self: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(_: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_ref(state))
    }
}
