//! Core user domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::PasswordHash;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password hash is never serialized, so a `User` can be returned to clients as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The user's ID in the application database.
    #[serde(rename = "_id")]
    pub id: UserID,
    /// The name the user signed up with.
    pub username: String,
    /// The user's email address, unique across users.
    pub email: String,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
}

/// The details needed to register a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The display name.
    pub username: String,
    /// The email used to log in. Must not belong to another user.
    pub email: String,
    /// The bcrypt hash of the user's password.
    pub password_hash: PasswordHash,
}
