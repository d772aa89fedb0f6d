//! Identity model and the identity-provider boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! Identities are issued by an external provider. Consumers never register
//! callbacks; they hand the provider the sending half of a channel and keep
//! the returned [`Unsubscribe`] handle. Provider adapters fan identity changes
//! out through an [`IdentityHub`], which also replays the current identity to
//! subscribers that arrive after the first notification.

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures::channel::mpsc;
use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTITY
// =============================================================================

/// An authenticated user as issued by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned unique user identifier.
    pub uid: String,
    /// Account email. Some federated accounts have none.
    pub email: Option<String>,
}

impl Identity {
    /// Email if present, otherwise the uid.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.uid)
    }
}

/// One authentication-state notification: the new identity, or `None` after
/// sign-out.
pub type IdentityEvent = Option<Identity>;

/// Sending half handed to [`IdentityProvider::subscribe`].
pub type IdentitySink = mpsc::UnboundedSender<IdentityEvent>;

/// Receiving half owned by the subscriber.
pub type IdentityStream = mpsc::UnboundedReceiver<IdentityEvent>;

/// Create a connected sink/stream pair for one subscription.
#[must_use]
pub fn identity_channel() -> (IdentitySink, IdentityStream) {
    mpsc::unbounded()
}

/// Federated credential obtained from Google's OAuth flow.
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleCredential {
    /// Google-issued OpenID Connect ID token.
    pub id_token: String,
}

impl fmt::Debug for GoogleCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCredential").field("id_token", &"<redacted>").finish()
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Provider-specific failure carrying a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    /// Raw provider error code (e.g. `EMAIL_EXISTS`), when one was returned.
    pub code: Option<String>,
    /// Message suitable for showing to the user.
    pub message: String,
}

impl AuthError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { code: None, message: message.into() }
    }

    #[must_use]
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: Some(code.into()), message: message.into() }
    }
}

// =============================================================================
// SUBSCRIPTION HANDLE
// =============================================================================

/// Handle returned by [`IdentityProvider::subscribe`].
///
/// The release action runs exactly once: on [`Unsubscribe::release`] or on
/// drop, whichever comes first.
#[must_use = "dropping the handle releases the subscription immediately"]
pub struct Unsubscribe {
    release: Option<Box<dyn FnOnce()>>,
}

impl Unsubscribe {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// Release the subscription now.
    pub fn release(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").field("pending", &self.release.is_some()).finish()
    }
}

// =============================================================================
// PROVIDER TRAIT
// =============================================================================

/// Boundary to an external identity platform.
#[async_trait::async_trait(?Send)]
pub trait IdentityProvider {
    /// Register `sink` for identity-change notifications.
    fn subscribe(&self, sink: IdentitySink) -> Unsubscribe;

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, e.g. when the email is already taken.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the provider's error for unknown accounts or bad credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Sign in with a Google federated credential.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the credential is rejected.
    async fn sign_in_with_google(&self, credential: &GoogleCredential) -> Result<Identity, AuthError>;

    /// Sign the current user out.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the session could not be ended.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

// =============================================================================
// IDENTITY HUB
// =============================================================================

/// Provider-side registry of subscriber sinks.
///
/// Holds the last published identity so late subscribers immediately receive
/// the resolved state. Before the first [`IdentityHub::publish`] nothing is
/// replayed and subscribers stay in their loading state.
#[derive(Clone, Default)]
pub struct IdentityHub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    resolved: Option<IdentityEvent>,
    next_id: u64,
    sinks: BTreeMap<u64, IdentitySink>,
}

impl IdentityHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink. The returned handle removes it again.
    pub fn subscribe(&self, sink: IdentitySink) -> Unsubscribe {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            let live = match &inner.resolved {
                Some(current) => sink.unbounded_send(current.clone()).is_ok(),
                None => !sink.is_closed(),
            };
            if live {
                inner.sinks.insert(id, sink);
            }
            id
        };

        let weak: Weak<Mutex<HubInner>> = Arc::downgrade(&self.inner);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().unwrap_or_else(PoisonError::into_inner).sinks.remove(&id);
            }
        })
    }

    /// Record a new identity and notify every live subscriber.
    /// Sinks whose receivers are gone are dropped.
    pub fn publish(&self, identity: IdentityEvent) {
        let mut inner = self.lock();
        inner.resolved = Some(identity.clone());
        inner.sinks.retain(|_, sink| sink.unbounded_send(identity.clone()).is_ok());
        tracing::debug!(
            uid = identity.as_ref().map_or("-", |i| i.uid.as_str()),
            subscribers = inner.sinks.len(),
            "identity published"
        );
    }

    /// Last published identity, `None` when signed out or not yet resolved.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.lock().resolved.clone().flatten()
    }

    /// Whether at least one notification has been published.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.lock().resolved.is_some()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().sinks.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for IdentityHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("IdentityHub")
            .field("resolved", &inner.resolved)
            .field("subscribers", &inner.sinks.len())
            .finish()
    }
}
