//! CLI Supabase auth/session helpers with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use jotter_core::auth::{AuthResult, SessionPersistence, SupabaseAuthClient};
pub use jotter_core::auth::{AuthError, AuthSession};
use jotter_core::config::ResolvedBackendConfig;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "jotter-cli";

pub type CliAuthClient = SupabaseAuthClient<KeyringSessionStore>;

/// Keychain slot holding one profile's Supabase session.
#[derive(Clone)]
pub struct KeyringSessionStore {
    username: String,
}

impl KeyringSessionStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("supabase_session:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for KeyringSessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard
            .get(&self.username)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(AuthError::from)
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> AuthResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub fn auth_client_for(
    profile_name: &str,
    backend: &ResolvedBackendConfig,
) -> AuthResult<CliAuthClient> {
    SupabaseAuthClient::new(
        &backend.supabase_url,
        backend.supabase_anon_key.clone(),
        KeyringSessionStore::new(profile_name),
    )
}

#[cfg(test)]
fn load_stored_session(profile_name: &str) -> AuthResult<Option<AuthSession>> {
    KeyringSessionStore::new(profile_name).load_session()
}

pub fn clear_stored_session(profile_name: &str) -> AuthResult<()> {
    KeyringSessionStore::new(profile_name).clear_session()
}

#[cfg(test)]
mod tests {
    use jotter_core::auth::AuthUser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn session(user: &str) -> AuthSession {
        AuthSession {
            access_token: format!("access-{user}"),
            refresh_token: format!("refresh-{user}"),
            expires_at: 4_000_000_000,
            user: AuthUser {
                id: user.to_string(),
                email: Some(format!("{user}@example.com")),
            },
        }
    }

    #[test]
    fn sessions_are_kept_per_profile() {
        let work = KeyringSessionStore::new("auth-test-work");
        let home = KeyringSessionStore::new("auth-test-home");
        work.save_session(&session("worker")).unwrap();

        let loaded = load_stored_session("auth-test-work").unwrap().unwrap();
        assert_eq!(loaded.user.id, "worker");
        assert!(home.load_session().unwrap().is_none());

        clear_stored_session("auth-test-work").unwrap();
        assert!(load_stored_session("auth-test-work").unwrap().is_none());
    }

    #[test]
    fn clearing_a_missing_session_is_ok() {
        clear_stored_session("auth-test-never-signed-in").unwrap();
    }

    #[test]
    fn auth_client_builds_from_resolved_backend() {
        let backend = ResolvedBackendConfig {
            supabase_url: "https://demo.supabase.co".to_string(),
            supabase_anon_key: "anon".to_string(),
            notes_table: "notes".to_string(),
        };
        assert!(auth_client_for("auth-test-client", &backend).is_ok());
    }
}
