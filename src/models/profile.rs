//! Profile form model, persisted per user email.

use serde::{Deserialize, Serialize};

use super::User;

/// Notification channels a user opted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: true,
        }
    }
}

/// Editable profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

impl Profile {
    /// Defaults shown before the user saved anything.
    pub fn for_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: "555-123-4567".to_string(),
            address: "123 Main Street, Anytown, USA".to_string(),
            notifications: NotificationPreferences::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults_from_user() {
        let user = User::with_id("1", "Jane Smith", "jane@example.com");
        let profile = Profile::for_user(&user);

        assert_eq!(profile.name, "Jane Smith");
        assert_eq!(profile.email, "jane@example.com");
        assert!(profile.notifications.email);
        assert!(!profile.notifications.sms);
    }

    #[test]
    fn test_missing_notifications_default_on_parse() {
        let profile: Profile = serde_json::from_str(
            r#"{"name":"A","email":"a@x.com","phone":"1","address":"here"}"#,
        )
        .unwrap();

        assert_eq!(profile.notifications, NotificationPreferences::default());
    }
}
