//! Firebase Authentication adapter over the Identity Toolkit REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`FirebaseAuth`] implements [`IdentityProvider`] for both hosts. It sends
//! `accounts:signUp`, `accounts:signInWithPassword` and
//! `accounts:signInWithIdp` through an [`HttpTransport`], persists the
//! returned tokens through a [`SessionStore`], and broadcasts every identity
//! change through its [`IdentityHub`].
//!
//! DESIGN
//! ======
//! The hub stays unresolved until [`FirebaseAuth::restore`] or the first
//! sign-in/sign-out, so trackers started before then report `Loading`.
//! Persisting is best-effort: a store failure is logged and the in-memory
//! identity still changes.

#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;

use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::identity::{AuthError, GoogleCredential, Identity, IdentityHub, IdentityProvider, IdentitySink, Unsubscribe};
use crate::store::{SessionStore, StoredSession};
use crate::transport::{HttpReply, HttpTransport};

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_PROVIDER_ID: &str = "google.com";
const GOOGLE_SCOPES: &str = "openid email profile";
const STATE_MISMATCH: &str = "STATE_MISMATCH";

// =============================================================================
// CONFIG
// =============================================================================

/// Connection settings for the Identity Toolkit API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    /// e.g. `https://identitytoolkit.googleapis.com/v1`, no trailing slash.
    pub base_url: String,
    /// `requestUri` sent with federated sign-in.
    pub request_uri: String,
}

impl FirebaseConfig {
    /// Full URL for an `accounts:<method>` call.
    #[must_use]
    pub fn endpoint(&self, method: &str) -> String {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("key", &self.api_key)
            .finish();
        format!("{}/accounts:{method}?{query}", self.base_url.trim_end_matches('/'))
    }
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

impl AccountResponse {
    fn into_session(self) -> StoredSession {
        StoredSession {
            uid: self.local_id,
            email: self.email.filter(|e| !e.is_empty()),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        }
    }
}

fn password_body(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password, "returnSecureToken": true })
}

fn idp_body(credential: &GoogleCredential, request_uri: &str) -> Value {
    let post_body: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("id_token", &credential.id_token)
        .append_pair("providerId", GOOGLE_PROVIDER_ID)
        .finish();
    json!({
        "postBody": post_body,
        "requestUri": request_uri,
        "returnSecureToken": true,
        "returnIdpCredential": true,
    })
}

/// Turn an Identity Toolkit reply into a session or a readable error.
fn parse_account_reply(reply: &HttpReply) -> Result<StoredSession, AuthError> {
    if !reply.is_success() {
        return Err(parse_error_reply(reply));
    }
    serde_json::from_str::<AccountResponse>(&reply.body)
        .map(AccountResponse::into_session)
        .map_err(|e| AuthError::new(format!("unexpected identity service response: {e}")))
}

/// Extract `error.message` (`"CODE"` or `"CODE : detail"`) and map it.
fn parse_error_reply(reply: &HttpReply) -> AuthError {
    let raw = match serde_json::from_str::<Value>(&reply.body) {
        Ok(body) => body.pointer("/error/message").and_then(Value::as_str).map(str::to_owned),
        Err(_) => None,
    };
    let Some(raw) = raw else {
        return AuthError::new(format!("identity service returned status {}", reply.status));
    };
    let (code, detail) = match raw.split_once(" : ") {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (raw.trim(), None),
    };
    AuthError::with_code(code, describe_error(code, detail))
}

/// Human-readable text for an Identity Toolkit error code.
#[must_use]
pub fn describe_error(code: &str, detail: Option<&str>) -> String {
    let known = match code {
        "EMAIL_EXISTS" => "The email address is already in use by another account.",
        "EMAIL_NOT_FOUND" => "There is no user record corresponding to this email.",
        "INVALID_PASSWORD" => "The password is invalid.",
        "INVALID_LOGIN_CREDENTIALS" => "Invalid email or password.",
        "INVALID_EMAIL" => "The email address is badly formatted.",
        "MISSING_EMAIL" => "An email address is required.",
        "MISSING_PASSWORD" => "A password is required.",
        "WEAK_PASSWORD" => return detail.unwrap_or("Password should be at least 6 characters.").to_owned(),
        "USER_DISABLED" => "The user account has been disabled by an administrator.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Try again later.",
        "OPERATION_NOT_ALLOWED" => "This sign-in method is not enabled.",
        "INVALID_IDP_RESPONSE" => "The Google credential was rejected.",
        _ => {
            return match detail {
                Some(detail) => format!("{code}: {detail}"),
                None => code.to_owned(),
            };
        }
    };
    known.to_owned()
}

// =============================================================================
// GOOGLE REDIRECT FLOW
// =============================================================================

/// Google OAuth URL that returns an ID token in the redirect fragment.
///
/// `state` comes back unchanged in the fragment and must be checked with
/// [`verify_redirect_fragment`] before the token is used.
///
/// # Errors
///
/// Returns [`AuthError`] if the authorize URL cannot be built.
pub fn google_authorize_url(
    client_id: &str,
    redirect_uri: &str,
    nonce: &str,
    state: &str,
) -> Result<String, AuthError> {
    Url::parse_with_params(
        GOOGLE_AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "id_token"),
            ("scope", GOOGLE_SCOPES),
            ("nonce", nonce),
            ("state", state),
            ("prompt", "select_account"),
        ],
    )
    .map(String::from)
    .map_err(|e| AuthError::new(format!("invalid Google authorize URL: {e}")))
}

fn fragment_value(fragment: &str, key: &str) -> Option<String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(k, value)| k == key && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Read `id_token` from a redirect fragment such as `#id_token=...&state=...`.
#[must_use]
pub fn parse_id_token_fragment(fragment: &str) -> Option<GoogleCredential> {
    fragment_value(fragment, "id_token").map(|id_token| GoogleCredential { id_token })
}

/// Accept a redirect credential only if its `state` matches the one issued
/// when the redirect started.
///
/// Returns `Ok(None)` when the fragment carries no token.
///
/// # Errors
///
/// Returns [`AuthError`] with code `STATE_MISMATCH` when no redirect was
/// pending or the returned state differs.
pub fn verify_redirect_fragment(
    fragment: &str,
    expected_state: Option<&str>,
) -> Result<Option<GoogleCredential>, AuthError> {
    let Some(credential) = parse_id_token_fragment(fragment) else {
        return Ok(None);
    };
    let returned = fragment_value(fragment, "state");
    match (expected_state, returned.as_deref()) {
        (Some(expected), Some(returned)) if !expected.is_empty() && expected == returned => Ok(Some(credential)),
        (None, _) => {
            tracing::warn!("google redirect arrived with no pending sign-in");
            Err(AuthError::with_code(STATE_MISMATCH, "No Google sign-in was started from this page."))
        }
        _ => {
            tracing::warn!("google redirect state did not match");
            Err(AuthError::with_code(STATE_MISMATCH, "The Google sign-in response did not match this page."))
        }
    }
}

// =============================================================================
// ADAPTER
// =============================================================================

pub struct FirebaseAuth<T, S> {
    transport: T,
    store: S,
    config: FirebaseConfig,
    hub: IdentityHub,
}

impl<T, S> FirebaseAuth<T, S>
where
    T: HttpTransport,
    S: SessionStore,
{
    #[must_use]
    pub fn new(transport: T, store: S, config: FirebaseConfig) -> Self {
        Self { transport, store, config, hub: IdentityHub::new() }
    }

    #[must_use]
    pub fn hub(&self) -> &IdentityHub {
        &self.hub
    }

    #[must_use]
    pub fn config(&self) -> &FirebaseConfig {
        &self.config
    }

    /// Load the persisted session and publish the first notification.
    /// A store that cannot be read counts as signed out.
    pub fn restore(&self) -> Option<Identity> {
        let identity = match self.store.load() {
            Ok(session) => session.map(|s| s.identity()),
            Err(e) => {
                tracing::warn!(error = %e, "could not load persisted session; starting signed out");
                None
            }
        };
        tracing::debug!(uid = identity.as_ref().map_or("-", |i| i.uid.as_str()), "session restored");
        self.hub.publish(identity.clone());
        identity
    }

    async fn call(&self, method: &str, body: &Value) -> Result<Identity, AuthError> {
        let url = self.config.endpoint(method);
        let reply = self.transport.post_json(&url, body).await.map_err(|e| {
            tracing::warn!(error = %e, method, "identity request failed");
            AuthError::new(e.0)
        })?;
        let session = parse_account_reply(&reply).inspect_err(|e| {
            tracing::info!(method, status = reply.status, code = e.code.as_deref().unwrap_or("-"), "identity call rejected");
        })?;

        if let Err(e) = self.store.save(&session) {
            tracing::warn!(error = %e, "could not persist session");
        }
        let identity = session.identity();
        tracing::info!(method, uid = %identity.uid, "signed in");
        self.hub.publish(Some(identity.clone()));
        Ok(identity)
    }
}

#[async_trait::async_trait(?Send)]
impl<T, S> IdentityProvider for FirebaseAuth<T, S>
where
    T: HttpTransport,
    S: SessionStore,
{
    fn subscribe(&self, sink: IdentitySink) -> Unsubscribe {
        self.hub.subscribe(sink)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.call("signUp", &password_body(email, password)).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.call("signInWithPassword", &password_body(email, password)).await
    }

    async fn sign_in_with_google(&self, credential: &GoogleCredential) -> Result<Identity, AuthError> {
        self.call("signInWithIdp", &idp_body(credential, &self.config.request_uri)).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear persisted session");
        }
        tracing::info!("signed out");
        self.hub.publish(None);
        Ok(())
    }
}
