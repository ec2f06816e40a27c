//! JSON Web Token creation and verification for the REST API.
//!
//! Route handlers opt into authentication by taking a [Claims] argument: the
//! extractor reads the bearer token from the `Authorization` header and
//! rejects the request with a 401 response when the token is missing, invalid,
//! or expired.

use axum::{RequestPartsExt, extract::FromRef, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{AppState, Error, models::UserID};

// Code in this module is adapted from https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

/// How long an auth token stays valid after it is issued.
pub const TOKEN_DURATION: Duration = Duration::days(7);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// The ID of the user the token was issued to.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

impl<S> axum::extract::FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        let app_state = parts
            .extract_with_state::<AppState, _>(state)
            .await
            .map_err(|_| Error::InvalidToken)?;

        let token_data = decode_token(bearer.token(), app_state.decoding_key())?;

        Ok(token_data.claims)
    }
}

/// Create a signed auth token for `user_id`.
///
/// # Errors
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.unix_timestamp() as usize,
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|e| {
        tracing::error!("Error creating auth token: {e:?}");
        Error::TokenCreation
    })
}

fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, Error> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| Error::InvalidToken)
}

#[cfg(test)]
mod token_tests {
    use jsonwebtoken::{DecodingKey, EncodingKey};

    use crate::{Error, models::UserID};

    use super::{decode_token, encode_token};

    fn test_keys() -> (EncodingKey, DecodingKey) {
        let secret = "42";
        (
            EncodingKey::from_secret(secret.as_ref()),
            DecodingKey::from_secret(secret.as_ref()),
        )
    }

    #[test]
    fn decode_token_gives_correct_user_id() {
        let (encoding_key, decoding_key) = test_keys();
        let user_id = UserID::new(1337);

        let token = encode_token(user_id, &encoding_key).unwrap();
        let claims = decode_token(&token, &decoding_key).unwrap().claims;

        assert_eq!(claims.user_id(), user_id);
    }

    #[test]
    fn decode_token_fails_on_wrong_secret() {
        let (encoding_key, _) = test_keys();
        let wrong_key = DecodingKey::from_secret("not 42".as_ref());

        let token = encode_token(UserID::new(1), &encoding_key).unwrap();
        let result = decode_token(&token, &wrong_key);

        assert!(matches!(result, Err(Error::InvalidToken)));
    }

    #[test]
    fn decode_token_fails_on_garbage() {
        let (_, decoding_key) = test_keys();

        let result = decode_token("not.a.token", &decoding_key);

        assert!(matches!(result, Err(Error::InvalidToken)));
    }
}
