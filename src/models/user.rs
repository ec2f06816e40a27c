//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from a raw integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// To create a `User` in the database, use [NewUser](crate::models::NewUser).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserID,
    name: String,
    email: EmailAddress,
    password_hash: PasswordHash,
}

impl User {
    /// Create a user from its parts.
    ///
    /// This is intended for reconstructing a user that already exists in the
    /// database. To register a new user, use [NewUser](crate::models::NewUser).
    pub fn new(id: UserID, name: String, email: EmailAddress, password_hash: PasswordHash) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// The data needed to register a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address. Must be unique across the application.
    pub email: EmailAddress,
    /// The user's hashed password.
    pub password_hash: PasswordHash,
}
