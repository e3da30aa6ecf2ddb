//! Auth store
//!
//! Holds the session and the user list and implements login, registration,
//! password reset and logout.
//!
//! Two variants exist:
//! - `Registered`: users register themselves; login matches email and
//!   password; the user list is persisted with the session.
//! - `Fixture`: a fixed user table sharing one password; login checks the
//!   password first and then looks the user up by email. Only the session is
//!   persisted, so users registered in this variant are gone after a reload.
//!
//! Failures never reach the caller. They are stored as a message on the
//! store's error field and the caller observes them once busy clears.
//!
//! The persisted record lives under [`AUTH_STORAGE_KEY`] as
//! `{"state": {"user", "isAuthenticated", "users"?}, "version": 0}` and is
//! rewritten whenever the session or the user list changes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::{AuthConfig, AuthVariantKind};
use crate::fixtures;
use crate::models::{Session, User};
use crate::services::password::{credential_matches, hash_password};
use crate::services::store::{HasStatus, Latency, OperationStatus, Store};
use crate::storage::{read_json, write_json, KeyValueStorage};

/// Storage key of the persisted session
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

const PERSISTED_VERSION: u32 = 0;

/// Error types for auth operations. The message is what the user sees.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidEmailOrPassword,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already in use")]
    EmailInUse,

    #[error("An error occurred")]
    Internal(#[source] anyhow::Error),
}

/// Where users come from and how they are matched on login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthVariant {
    Registered,
    Fixture { shared_password: String },
}

impl AuthVariant {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.variant {
            AuthVariantKind::Registered => AuthVariant::Registered,
            AuthVariantKind::Fixture => AuthVariant::Fixture {
                shared_password: config.shared_password.clone(),
            },
        }
    }

    fn persists_users(&self) -> bool {
        matches!(self, AuthVariant::Registered)
    }
}

/// Observable state of the auth store
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub session: Session,
    pub users: Vec<User>,
    pub status: OperationStatus,
}

impl HasStatus for AuthState {
    fn status(&self) -> &OperationStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut OperationStatus {
        &mut self.status
    }
}

impl AuthState {
    pub fn current_user(&self) -> Option<&User> {
        if self.session.is_authenticated {
            self.session.user.as_ref()
        } else {
            None
        }
    }

    fn has_email(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email == email)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedAuth {
    state: PersistedAuthState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAuthState {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    users: Option<Vec<User>>,
}

/// Auth store
pub struct AuthStore {
    state: Store<AuthState>,
    variant: AuthVariant,
    storage: Arc<dyn KeyValueStorage>,
    latency: Latency,
}

impl AuthStore {
    /// Create the store and restore any persisted session.
    ///
    /// A persisted session that is inconsistent or references a user missing
    /// from the user list is discarded.
    pub fn new(variant: AuthVariant, storage: Arc<dyn KeyValueStorage>, latency: Latency) -> Self {
        let persisted: Option<PersistedAuth> = read_json(storage.as_ref(), AUTH_STORAGE_KEY);

        let (session, stored_users) = match persisted {
            Some(p) => (
                Session {
                    user: p.state.user,
                    is_authenticated: p.state.is_authenticated,
                },
                p.state.users,
            ),
            None => (Session::default(), None),
        };

        let users = match &variant {
            AuthVariant::Fixture { .. } => fixtures::users(),
            AuthVariant::Registered => stored_users.unwrap_or_default(),
        };

        let session = restore_session(session, &users);
        if session.is_authenticated {
            tracing::info!("Restored session for user {}", session.user_id().unwrap_or_default());
        }

        Self {
            state: Store::new(AuthState {
                session,
                users,
                status: OperationStatus::default(),
            }),
            variant,
            storage,
            latency,
        }
    }

    pub fn variant(&self) -> &AuthVariant {
        &self.variant
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn session(&self) -> Session {
        self.state.read(|s| s.session.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read(|s| s.current_user().cloned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|s| s.session.is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) {
        self.state.begin();
        self.latency.wait().await;

        match self.authenticate(email, password) {
            Ok(user) => {
                self.state.update(|s| {
                    s.session = Session::authenticated(&user);
                    s.status.succeed();
                });
                self.persist();
                tracing::info!("User {} logged in", user.id);
            }
            Err(e) => {
                tracing::debug!("Login failed for {}: {}", email, e);
                self.state.fail(e);
            }
        }
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        match &self.variant {
            AuthVariant::Registered => {
                // Verify outside the state lock, hashing is slow.
                let candidates: Vec<User> = self.state.read(|s| {
                    s.users.iter().filter(|u| u.email == email).cloned().collect()
                });
                candidates
                    .into_iter()
                    .find(|u| credential_matches(u.password_hash.as_deref(), password))
                    .ok_or(AuthError::InvalidEmailOrPassword)
            }
            AuthVariant::Fixture { shared_password } => {
                if password != shared_password {
                    return Err(AuthError::InvalidCredentials);
                }
                self.state
                    .read(|s| s.users.iter().find(|u| u.email == email).cloned())
                    .ok_or(AuthError::UserNotFound)
            }
        }
    }

    /// Register a new user and log in as that user.
    pub async fn register(&self, name: &str, email: &str, password: &str) {
        self.state.begin();
        self.latency.wait().await;

        match self.create_user(name, email, password) {
            Ok(user) => {
                self.persist();
                tracing::info!("Registered user {}", user.id);
            }
            Err(e) => {
                tracing::debug!("Registration failed for {}: {}", email, e);
                self.state.fail(e);
            }
        }
    }

    fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        if self.state.read(|s| s.has_email(email)) {
            return Err(AuthError::EmailInUse);
        }

        let hash = hash_password(password).map_err(AuthError::Internal)?;
        let user = User::new(name, email, Some(hash));

        // Re-checked under the same update that appends: a concurrent
        // registration may have claimed the email while hashing.
        self.state.update(|s| {
            if s.has_email(email) {
                return Err(AuthError::EmailInUse);
            }
            s.users.push(user.clone());
            s.session = Session::authenticated(&user);
            s.status.succeed();
            Ok(user)
        })
    }

    /// Request a password reset.
    ///
    /// Succeeds for any known email; no notification is actually sent.
    pub async fn reset_password(&self, email: &str) {
        self.state.begin();
        self.latency.wait().await;

        let known = self.state.read(|s| s.has_email(email));
        if known {
            tracing::info!("Password reset requested for {}", email);
            self.state.update(|s| s.status.succeed());
        } else {
            self.state.fail(AuthError::UserNotFound);
        }
    }

    /// Clear the session. Synchronous and idempotent.
    pub fn logout(&self) {
        let user_id = self.state.update(|s| {
            let id = s.session.user_id().map(str::to_string);
            s.session = Session::default();
            id
        });
        self.persist();
        if let Some(id) = user_id {
            tracing::info!("User {} logged out", id);
        }
    }

    fn persist(&self) {
        let record = self.state.read(|s| PersistedAuth {
            state: PersistedAuthState {
                user: s.session.user.clone(),
                is_authenticated: s.session.is_authenticated,
                users: self.variant.persists_users().then(|| s.users.clone()),
            },
            version: PERSISTED_VERSION,
        });

        if let Err(e) = write_json(self.storage.as_ref(), AUTH_STORAGE_KEY, &record) {
            tracing::warn!("Failed to persist session: {:#}", e);
        }
    }
}

/// Keep a restored session only if it still references a known user.
fn restore_session(session: Session, users: &[User]) -> Session {
    if !session.is_consistent() {
        if session.user.is_some() || session.is_authenticated {
            tracing::warn!("Discarding inconsistent persisted session");
        }
        return Session::default();
    }

    match &session.user {
        None => session,
        Some(user) if users.iter().any(|u| u.id == user.id && u.email == user.email) => session,
        Some(user) => {
            tracing::warn!("Discarding persisted session for unknown user {}", user.id);
            Session::default()
        }
    }
}
