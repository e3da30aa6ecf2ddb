//! Session model

use serde::{Deserialize, Serialize};

use super::User;

/// Which user, if any, is authenticated in this client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The authenticated user
    pub user: Option<User>,
    /// Whether the session is authenticated
    pub is_authenticated: bool,
}

impl Session {
    /// Authenticated session for the given user. The credential is dropped.
    pub fn authenticated(user: &User) -> Self {
        Self {
            user: Some(user.without_credentials()),
            is_authenticated: true,
        }
    }

    /// Identifier of the authenticated user
    pub fn user_id(&self) -> Option<&str> {
        if !self.is_authenticated {
            return None;
        }
        self.user.as_ref().map(|u| u.id.as_str())
    }

    /// Both fields agree: authenticated iff a user is present.
    pub fn is_consistent(&self) -> bool {
        self.is_authenticated == self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_anonymous() {
        let session = Session::default();

        assert!(!session.is_authenticated);
        assert!(session.user_id().is_none());
        assert!(session.is_consistent());
    }

    #[test]
    fn test_authenticated_session_has_user_id() {
        let user = User::new("Jane", "jane@example.com", Some("hash".into()));
        let session = Session::authenticated(&user);

        assert_eq!(session.user_id(), Some(user.id.as_str()));
        assert!(session.user.as_ref().unwrap().password_hash.is_none());
    }

    #[test]
    fn test_session_json_shape() {
        let json = serde_json::to_value(Session::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "user": null, "isAuthenticated": false }));
    }
}
