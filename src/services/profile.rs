//! Profile store
//!
//! Profiles are kept in key-value storage under `profile:<email>`. Loading
//! is synchronous; saving brackets the write with the busy flag and a
//! simulated delay.

use std::sync::Arc;
use tokio::sync::watch;

use crate::models::{Profile, User};
use crate::services::password::MIN_PASSWORD_LEN;
use crate::services::store::{HasStatus, Latency, OperationStatus, Store};
use crate::storage::{read_json, write_json, KeyValueStorage};

/// Error types for profile operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("New passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Email is required")]
    MissingEmail,

    #[error("Failed to save profile")]
    Storage,
}

/// Observable state of the profile store
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub status: OperationStatus,
}

impl HasStatus for ProfileState {
    fn status(&self) -> &OperationStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut OperationStatus {
        &mut self.status
    }
}

fn storage_key(email: &str) -> String {
    format!("profile:{}", email)
}

/// Profile store
pub struct ProfileStore {
    state: Store<ProfileState>,
    storage: Arc<dyn KeyValueStorage>,
    latency: Latency,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, latency: Latency) -> Self {
        Self {
            state: Store::new(ProfileState::default()),
            storage,
            latency,
        }
    }

    pub fn snapshot(&self) -> ProfileState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    /// Load the saved profile of `user`, or defaults derived from the user.
    pub fn load(&self, user: &User) -> Profile {
        let profile = read_json(self.storage.as_ref(), &storage_key(&user.email))
            .unwrap_or_else(|| Profile::for_user(user));
        self.state.update(|s| s.profile = Some(profile.clone()));
        profile
    }

    /// Save a profile under its email.
    pub async fn save(&self, profile: Profile) {
        self.state.begin();
        self.latency.wait().await;

        match self.write(&profile) {
            Ok(()) => {
                tracing::info!("Profile saved for {}", profile.email);
                self.state.update(|s| {
                    s.profile = Some(profile);
                    s.status.succeed();
                });
            }
            Err(e) => self.state.fail(e),
        }
    }

    fn write(&self, profile: &Profile) -> Result<(), ProfileError> {
        if profile.email.trim().is_empty() {
            return Err(ProfileError::MissingEmail);
        }
        write_json(self.storage.as_ref(), &storage_key(&profile.email), profile).map_err(|e| {
            tracing::warn!("Failed to write profile for {}: {:#}", profile.email, e);
            ProfileError::Storage
        })
    }
}

/// Check a password change request. No user is modified.
pub fn validate_password_change(new_password: &str, confirm: &str) -> Result<(), ProfileError> {
    if new_password != confirm {
        return Err(ProfileError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ProfileError::PasswordTooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn jane() -> User {
        User::with_id("1", "Jane Smith", "jane@example.com")
    }

    #[test]
    fn test_load_without_saved_profile_uses_defaults() {
        let store = ProfileStore::new(Arc::new(MemoryStorage::new()), Latency::NONE);

        let profile = store.load(&jane());

        assert_eq!(profile, Profile::for_user(&jane()));
        assert_eq!(store.snapshot().profile, Some(profile));
    }

    #[tokio::test]
    async fn test_saved_profile_is_loaded_by_email() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let store = ProfileStore::new(storage.clone(), Latency::NONE);

        let mut profile = Profile::for_user(&jane());
        profile.phone = "0803 123 4567".into();
        profile.notifications.sms = true;
        store.save(profile.clone()).await;
        assert_eq!(store.error(), None);

        let other = ProfileStore::new(storage, Latency::NONE);
        assert_eq!(other.load(&jane()), profile);
    }

    #[test]
    fn test_malformed_saved_profile_falls_back() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        storage.set("profile:jane@example.com", "not json").unwrap();
        let store = ProfileStore::new(storage, Latency::NONE);

        assert_eq!(store.load(&jane()), Profile::for_user(&jane()));
    }

    #[tokio::test]
    async fn test_save_without_email_fails() {
        let store = ProfileStore::new(Arc::new(MemoryStorage::new()), Latency::NONE);
        let mut profile = Profile::for_user(&jane());
        profile.email = " ".into();

        store.save(profile).await;

        assert_eq!(store.error().as_deref(), Some("Email is required"));
        assert!(store.snapshot().profile.is_none());
    }

    #[test]
    fn test_validate_password_change() {
        assert_eq!(validate_password_change("abcdefgh", "abcdefgX"), Err(ProfileError::PasswordMismatch));
        assert_eq!(validate_password_change("short", "short"), Err(ProfileError::PasswordTooShort));
        assert_eq!(validate_password_change("long enough", "long enough"), Ok(()));
        assert_eq!(
            ProfileError::PasswordTooShort.to_string(),
            "Password must be at least 8 characters"
        );
    }
}
