//! The signed-in identity.
//!
//! [`SessionStore`] is the only writer of the session. Everything else reads
//! it through [`SessionStore::session`]. The token and profile are persisted
//! under the fixed keys [`TOKEN_KEY`] and [`USER_KEY`].

pub mod storage;

use crate::api::models::{AuthResponse, UserProfile};
use storage::Storage;

pub use storage::{FileStorage, StorageError};
#[cfg(test)]
pub use storage::MemoryStorage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub name: String,
    pub email: String,
}

impl Session {
    /// Name if the backend supplied one, else the email.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

pub struct SessionStore {
    storage: Box<dyn Storage + Send>,
    current: Option<Session>,
}

impl SessionStore {
    /// Build the store and load any persisted session. The token is not
    /// checked against the server.
    pub fn restore(storage: Box<dyn Storage + Send>) -> Self {
        let current = read_persisted(storage.as_ref());
        match &current {
            Some(s) => tracing::info!(email = %s.email, "restored persisted session"),
            None => tracing::debug!("no persisted session"),
        }
        Self { storage, current }
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Adopt a successful login or registration and persist it.
    pub fn establish(&mut self, auth: AuthResponse) -> &Session {
        if let Err(e) = self.persist(&auth) {
            tracing::warn!(error = %e, "failed to persist session");
        }
        tracing::info!(email = %auth.user.email, "session established");
        self.current.insert(Session {
            token: auth.token,
            name: auth.user.name,
            email: auth.user.email,
        })
    }

    /// Drop the session locally. No request is made; repeated calls are harmless.
    pub fn logout(&mut self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear persisted session");
            }
        }
        if self.current.take().is_some() {
            tracing::info!("session cleared");
        }
    }

    fn persist(&mut self, auth: &AuthResponse) -> Result<(), StorageError> {
        let user = serde_json::to_string(&auth.user)?;
        self.storage.set(TOKEN_KEY, &auth.token)?;
        self.storage.set(USER_KEY, &user)?;
        Ok(())
    }
}

fn read_persisted(storage: &(dyn Storage + Send)) -> Option<Session> {
    let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
    let raw_user = storage.get(USER_KEY)?;
    let user: UserProfile = match serde_json::from_str(&raw_user) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring corrupt persisted profile");
            return None;
        }
    };
    Some(Session {
        token,
        name: user.name,
        email: user.email,
    })
}
