//! Session management for the admin client
//!
//! [`SessionManager`] is the only place that reads or writes credentials.
//! It is created once at the composition root and handed to the guard, the
//! gateway and the auth client.

mod store;
mod types;

use log::{info, warn};
use std::sync::{Arc, RwLock};

use crate::error::Result;

pub use store::*;
pub use types::*;

/// Shared handle over the stored credentials
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    current: Arc<RwLock<Option<Credentials>>>,
}

impl SessionManager {
    /// Load whatever credentials `store` already holds
    pub fn restore(store: Arc<dyn CredentialStore>) -> Result<Self> {
        let current = match store.get(TOKEN_KEY)? {
            Some(token) => {
                let profile = match store.get(USER_KEY)? {
                    Some(raw) => match serde_json::from_str::<AdminProfile>(&raw) {
                        Ok(profile) => Some(profile),
                        Err(e) => {
                            warn!("Ignoring unparseable stored profile: {}", e);
                            None
                        }
                    },
                    None => None,
                };
                Some(Credentials::new(token, profile))
            }
            None => None,
        };

        Ok(Self {
            store,
            current: Arc::new(RwLock::new(current)),
        })
    }

    /// A manager over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// The bearer token, if one is stored
    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|c| c.token.clone())
    }

    /// The stored profile, if any
    pub fn profile(&self) -> Option<AdminProfile> {
        self.read().as_ref().and_then(|c| c.profile.clone())
    }

    /// Presence of a token, nothing more. Expiry is left to the API.
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Persist freshly issued credentials
    pub fn store_credentials(&self, credentials: Credentials) -> Result<()> {
        self.store.set(TOKEN_KEY, &credentials.token)?;
        match &credentials.profile {
            Some(profile) => self.store.set(USER_KEY, &serde_json::to_string(profile)?)?,
            None => self.store.remove(USER_KEY)?,
        }

        info!(
            "Stored session for {}",
            credentials
                .profile
                .as_ref()
                .map(AdminProfile::display_name)
                .unwrap_or("unknown user")
        );
        *self.write() = Some(credentials);
        Ok(())
    }

    /// Forget the stored credentials
    pub fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        *self.write() = None;
        info!("Session cleared");
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Credentials>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Credentials>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_reads_existing_token_and_profile() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        store
            .set(USER_KEY, r#"{"_id":"u1","username":"admin","role":"admin","phone":"020"}"#)
            .unwrap();

        let session = SessionManager::restore(store).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok"));
        let profile = session.profile().unwrap();
        assert_eq!(profile.id.as_deref(), Some("u1"));
        assert_eq!(profile.display_name(), "admin");
        assert_eq!(profile.extra["phone"], "020");
    }

    #[test]
    fn restore_tolerates_broken_profile() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{not json").unwrap();

        let session = SessionManager::restore(store).unwrap();
        assert!(session.is_authenticated());
        assert!(session.profile().is_none());
    }

    #[test]
    fn store_and_clear_write_through() {
        let store = Arc::new(MemoryStore::new());
        let session = SessionManager::restore(store.clone()).unwrap();
        assert!(!session.is_authenticated());

        let profile = AdminProfile {
            username: Some("ops".into()),
            ..Default::default()
        };
        session
            .store_credentials(Credentials::new("t-1", Some(profile)))
            .unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t-1"));
        assert!(store.get(USER_KEY).unwrap().unwrap().contains("ops"));

        let other_handle = session.clone();
        other_handle.clear().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
    }
}
