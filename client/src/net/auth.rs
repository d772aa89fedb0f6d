//! Browser identity provider wiring and the Google redirect round-trip.
//!
//! SYSTEM CONTEXT
//! ==============
//! Settings are baked in at build time (`option_env!`), since a static WASM
//! bundle has no process environment. Google sign-in leaves the page for the
//! consent screen and comes back with `#id_token=...&state=...` in the URL
//! fragment; [`take_redirect_credential`] picks it up on the next load. The
//! `state` issued before leaving is kept in `sessionStorage` and must match.

use std::sync::Arc;

use courier::config::{ClientConfig, ConfigError};
use courier::firebase::{FirebaseAuth, google_authorize_url};
use courier::identity::{AuthError, GoogleCredential};

use super::store::LocalStorageStore;
use super::transport::BrowserTransport;

pub type BrowserAuth = FirebaseAuth<BrowserTransport, LocalStorageStore>;

/// `sessionStorage` key holding the state of a pending Google redirect.
pub const GOOGLE_STATE_KEY: &str = "uplink.google_state";

/// Value compiled into the bundle for a configuration key.
#[must_use]
pub fn build_time_setting(key: &str) -> Option<String> {
    let value = match key {
        "FIREBASE_API_KEY" => option_env!("FIREBASE_API_KEY"),
        "IDENTITY_BASE_URL" => option_env!("IDENTITY_BASE_URL"),
        "UPLOAD_ENDPOINT" => option_env!("UPLOAD_ENDPOINT"),
        "UPLOAD_TIMEOUT_SECS" => option_env!("UPLOAD_TIMEOUT_SECS"),
        "GOOGLE_CLIENT_ID" => option_env!("GOOGLE_CLIENT_ID"),
        "GOOGLE_REDIRECT_URI" => option_env!("GOOGLE_REDIRECT_URI"),
        _ => None,
    };
    value.map(str::to_owned)
}

/// Client settings from build-time values.
///
/// # Errors
///
/// Returns [`ConfigError`] when the bundle was built without an API key or
/// with an unparsable value.
pub fn browser_config() -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_lookup(build_time_setting)
}

#[must_use]
pub fn browser_auth(config: &ClientConfig) -> Arc<BrowserAuth> {
    Arc::new(FirebaseAuth::new(BrowserTransport, LocalStorageStore, config.firebase()))
}

/// Send the browser to Google's consent screen.
///
/// # Errors
///
/// Returns a message when no Google client is configured, the state cannot
/// be stored, or navigation fails.
pub fn begin_google_redirect(config: &ClientConfig) -> Result<(), String> {
    let client_id = config
        .google_client_id
        .as_deref()
        .ok_or_else(|| "Google sign-in is not configured".to_owned())?;
    let nonce = uuid::Uuid::new_v4().to_string();
    let state = uuid::Uuid::new_v4().to_string();
    let url = google_authorize_url(client_id, &config.google_redirect_uri, &nonce, &state).map_err(|e| e.message)?;
    #[cfg(feature = "csr")]
    {
        let window = web_sys::window().ok_or_else(|| "no window".to_owned())?;
        let storage = window
            .session_storage()
            .map_err(|e| format!("{e:?}"))?
            .ok_or_else(|| "sessionStorage is unavailable".to_owned())?;
        storage.set_item(GOOGLE_STATE_KEY, &state).map_err(|e| format!("{e:?}"))?;
        window.location().set_href(&url).map_err(|e| format!("{e:?}"))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (url, state);
        Err("Google sign-in is only available in the browser".to_owned())
    }
}

/// Consume a Google ID token left in the URL fragment by the redirect, and
/// strip the fragment so a reload does not replay it.
///
/// The pending state is removed either way, so one redirect yields at most
/// one credential.
///
/// # Errors
///
/// Returns [`AuthError`] when a token arrived without a matching pending
/// state.
pub fn take_redirect_credential() -> Result<Option<GoogleCredential>, AuthError> {
    #[cfg(feature = "csr")]
    {
        let Some(window) = web_sys::window() else {
            return Ok(None);
        };
        let location = window.location();
        let hash = location.hash().unwrap_or_default();
        if courier::firebase::parse_id_token_fragment(&hash).is_none() {
            return Ok(None);
        }

        let storage = window.session_storage().unwrap_or(None);
        let expected = storage.as_ref().and_then(|s| s.get_item(GOOGLE_STATE_KEY).unwrap_or(None));
        if let Some(storage) = &storage {
            if let Err(e) = storage.remove_item(GOOGLE_STATE_KEY) {
                log::warn!("could not clear pending Google state: {e:?}");
            }
        }

        let clean = location.pathname().unwrap_or_else(|_| "/".to_owned());
        if let Ok(history) = window.history() {
            if let Err(e) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&clean)) {
                log::warn!("could not strip redirect fragment: {e:?}");
            }
        }
        courier::firebase::verify_redirect_fragment(&hash, expected.as_deref())
    }
    #[cfg(not(feature = "csr"))]
    {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_have_no_value() {
        assert_eq!(build_time_setting("NOT_A_SETTING"), None);
    }

    #[test]
    fn google_redirect_requires_client_id() {
        let config = ClientConfig::from_lookup(|key| (key == "FIREBASE_API_KEY").then(|| "k".to_owned())).unwrap();
        assert_eq!(begin_google_redirect(&config), Err("Google sign-in is not configured".to_owned()));
    }

    #[cfg(not(feature = "csr"))]
    #[test]
    fn native_build_has_no_redirect_credential() {
        assert_eq!(take_redirect_credential(), Ok(None));
    }
}
