//! Identity provider abstraction, session persistence, and the session gate.

mod gate;
mod supabase;

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gate::{GateDecision, SessionGate};
pub use supabase::{normalize_auth_url, SupabaseAuthClient};

use crate::util::unix_timestamp_now;

const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Stable unique identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle for the signed-in user, as handed to the document store.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
    pub access_token: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: UserId::new(self.user.id.clone()),
            email: self.user.email.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("{0}")]
    Unknown(String),
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() || error.is_builder() {
            Self::Unknown(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Unknown(format!("Failed to parse JSON payload: {error}"))
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// External service validating credentials and issuing a stable user id.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in identity, if any. Never prompts.
    async fn current_identity(&self) -> Option<Identity>;

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Identity>;

    async fn sign_out(&self) -> AuthResult<()>;
}

pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Process-local session persistence; sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let guard = self
            .session
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: i64) -> AuthSession {
        AuthSession {
            access_token: "secret-access-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at,
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some("test@example.com".to_string()),
            },
        }
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let rendered = format!("{:?}", session(1_700_000_000));
        assert!(!rendered.contains("secret-access-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn identity_debug_redacts_token() {
        let rendered = format!("{:?}", session(1_700_000_000).identity());
        assert!(!rendered.contains("secret-access-token"));
        assert!(rendered.contains("user-1"));
    }

    #[test]
    fn session_expiry_includes_skew() {
        let now = unix_timestamp_now();
        assert!(session(now + 30).is_expired());
        assert!(!session(now + 3600).is_expired());
    }

    #[test]
    fn memory_session_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.load_session().unwrap().is_none());

        store.save_session(&session(1)).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session(1)));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }
}
