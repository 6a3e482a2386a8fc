use serde::{Deserialize, Serialize};

/// The authorization role carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// Represents a user session.
///
/// Stored as JSON under `session:<token>`; the cookie only ever carries the
/// token. A session is never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The ID of the user this session belongs to.
    pub id: String,
    /// The role granted to the session.
    pub role: Role,
}

impl SessionRecord {
    /// A session for a regular user.
    pub fn user(user_id: i32) -> Self {
        Self {
            id: user_id.to_string(),
            role: Role::User,
        }
    }
}
