use std::sync::Arc;

use common::constants::SESSION_KEY;
use common::{CredentialRegistry, Role, Session};

use crate::store::{KeyValueStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Kata laluan salah")]
    WrongPassword,
    #[error("No. IC tidak sah")]
    InvalidIc,
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Establishes, restores and clears the logged-in identity. The registry is
/// injected at construction; the persisted session is trusted on restore
/// without re-checking it.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    registry: CredentialRegistry,
}

impl SessionManager {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, registry: CredentialRegistry) -> Self {
        Self { store, registry }
    }

    /// Exact-match credential check against the partition for `role`. The
    /// failure message is role-specific: admins type passwords, users type
    /// IC numbers.
    pub fn login(&self, role: Role, name: &str, secret: &str) -> Result<Session, AuthError> {
        if !self.registry.verify(role, name, secret) {
            return Err(match role {
                Role::Admin => AuthError::WrongPassword,
                Role::User => AuthError::InvalidIc,
            });
        }

        let session = Session::new(role, Some(name.to_string()));
        self.store
            .set(SESSION_KEY, &serde_json::to_string(&session)?)?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(SESSION_KEY)?;
        Ok(())
    }

    /// The persisted session, if present and parseable. A malformed blob
    /// reads as logged out, never as an error.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        let blob = self.store.get(SESSION_KEY).ok().flatten()?;
        serde_json::from_str(&blob).ok()
    }

    #[must_use]
    pub const fn registry(&self) -> &CredentialRegistry {
        &self.registry
    }
}
