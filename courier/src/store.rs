//! Persistence boundary for the provider-managed session.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Tokens and identity persisted between runs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub uid: String,
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
}

impl StoredSession {
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity { uid: self.uid.clone(), email: self.email.clone() }
    }
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored session is malformed: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

/// Where a provider adapter keeps its [`StoredSession`].
pub trait SessionStore {
    /// Load the persisted session, `Ok(None)` when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read or holds
    /// something that is not a session.
    fn load(&self) -> Result<Option<StoredSession>, StoreError>;

    /// Persist `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;

    /// Remove any persisted session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        Self { session: Mutex::new(Some(session)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        Ok(self.session.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}
