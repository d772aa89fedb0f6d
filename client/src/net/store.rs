//! `localStorage` session store.

use courier::store::{SessionStore, StoreError, StoredSession};

pub const SESSION_KEY: &str = "uplink.session";

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

#[cfg(feature = "csr")]
fn storage() -> Result<web_sys::Storage, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_owned()))?;
    window
        .local_storage()
        .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
        .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_owned()))
}

#[cfg(not(feature = "csr"))]
fn unavailable() -> StoreError {
    StoreError::Unavailable("localStorage is only available in the browser".to_owned())
}

impl SessionStore for LocalStorageStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        #[cfg(feature = "csr")]
        {
            let raw = storage()?
                .get_item(SESSION_KEY)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
            match raw {
                Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
                None => Ok(None),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(unavailable())
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            let raw = serde_json::to_string(session)?;
            storage()?
                .set_item(SESSION_KEY, &raw)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = session;
            Err(unavailable())
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            storage()?
                .remove_item(SESSION_KEY)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(unavailable())
        }
    }
}
