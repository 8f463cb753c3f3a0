//! Session gate: admits an authenticated user or asks for credentials.

use std::sync::Arc;

use super::supabase::validate_credentials;
use super::{AuthResult, Identity, IdentityProvider};

/// Outcome of entering the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A valid identity already exists; skip credential entry.
    Admit(Identity),
    /// Credential entry is required.
    RequireCredentials,
}

#[derive(Clone)]
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.provider.current_identity().await.is_some()
    }

    /// Decide where the user lands. Calling this repeatedly is harmless.
    pub async fn enter(&self) -> GateDecision {
        match self.provider.current_identity().await {
            Some(identity) => {
                tracing::debug!("Session present for {}, skipping sign-in", identity.user_id);
                GateDecision::Admit(identity)
            }
            None => GateDecision::RequireCredentials,
        }
    }

    /// Exchange credentials for an identity.
    ///
    /// Empty fields are rejected without contacting the provider. Failures are
    /// returned as-is for the caller to show; nothing is retried.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let (email, password) = validate_credentials(email, password)?;
        match self.provider.sign_in(email, password).await {
            Ok(identity) => Ok(identity),
            Err(error) => {
                tracing::warn!("Sign-in failed: {}", error);
                Err(error)
            }
        }
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        self.provider.sign_out().await
    }
}
