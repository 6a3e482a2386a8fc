use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

use crate::error::{AppError, Result};

/// Represents a user in the system.
///
/// `password` and `salt` never leave the server; use [`PublicUser`] for
/// anything that is serialized into a response.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i32,
    /// The user's email address. Unique across users.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// Hex-encoded Argon2id digest of the password.
    pub password: String,
    /// Hex-encoded salt the digest was computed with.
    pub salt: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for User {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            password: row.try_get("password")?,
            salt: row.try_get("salt")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// The fields needed to insert a user.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub salt: String,
}

/// A user with the credential fields stripped.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}
