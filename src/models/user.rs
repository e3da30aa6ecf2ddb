//! User model
//!
//! A user is created on registration (or seeded from fixtures), looked up on
//! login and never updated in place by the state layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (unique within a user list)
    pub email: String,
    /// Password hash (argon2). Fixture users have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl User {
    /// Create a new user with a freshly generated identifier.
    ///
    /// The password should already be hashed, see
    /// `services::password::hash_password()`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            password_hash,
        }
    }

    /// Create a user with a known identifier (fixtures, tests).
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            password_hash: None,
        }
    }

    /// Copy of this user without the credential, as held by a session.
    pub fn without_credentials(&self) -> Self {
        Self {
            password_hash: None,
            ..self.clone()
        }
    }
}
