//! Fakes and fixtures shared by the unit tests in this crate.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::identity::{
    AuthError, GoogleCredential, Identity, IdentityHub, IdentityProvider, IdentitySink, Unsubscribe,
};
use crate::transport::{HttpReply, HttpTransport, MultipartForm, TransportError};
use crate::upload::SelectedFile;

#[must_use]
pub fn identity(uid: &str) -> Identity {
    Identity { uid: uid.to_owned(), email: Some(format!("{uid}@example.com")) }
}

#[must_use]
pub fn json_file(name: &str, body: &str) -> SelectedFile {
    SelectedFile::new(name, "application/json", body.as_bytes().to_vec())
}

// =============================================================================
// FakeProvider
// =============================================================================

/// Provider backed by an [`IdentityHub`] that counts subscribe/release calls.
#[derive(Default)]
pub struct FakeProvider {
    pub hub: IdentityHub,
    pub subscriptions: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    fn subscribe(&self, sink: IdentitySink) -> Unsubscribe {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        let inner = self.hub.subscribe(sink);
        let releases = self.releases.clone();
        Unsubscribe::new(move || {
            releases.fetch_add(1, Ordering::SeqCst);
            inner.release();
        })
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        self.sign_in(email, "").await
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        let identity = Identity { uid: format!("uid-{email}"), email: Some(email.to_owned()) };
        self.hub.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_google(&self, _credential: &GoogleCredential) -> Result<Identity, AuthError> {
        Err(AuthError::new("google sign-in not supported by fake"))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.hub.publish(None);
        Ok(())
    }
}

// =============================================================================
// RecordingTransport
// =============================================================================

/// A captured outbound request.
#[derive(Clone, Debug)]
pub enum Recorded {
    Json { url: String, body: Value },
    Multipart { url: String, form: MultipartForm },
}

/// Transport that records every call and answers from a queue of replies.
/// An empty queue answers `200 {}`.
#[derive(Default)]
pub struct RecordingTransport {
    pub calls: RefCell<Vec<Recorded>>,
    replies: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
}

impl RecordingTransport {
    pub fn replying(replies: Vec<Result<HttpReply, TransportError>>) -> Self {
        Self { calls: RefCell::new(Vec::new()), replies: RefCell::new(replies.into()) }
    }

    pub fn ok_json(status: u16, body: Value) -> Self {
        Self::replying(vec![Ok(HttpReply::new(status, body.to_string()))])
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn multipart_forms(&self) -> Vec<MultipartForm> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Recorded::Multipart { form, .. } => Some(form.clone()),
                Recorded::Json { .. } => None,
            })
            .collect()
    }

    pub fn json_calls(&self) -> Vec<(String, Value)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Recorded::Json { url, body } => Some((url.clone(), body.clone())),
                Recorded::Multipart { .. } => None,
            })
            .collect()
    }

    fn next_reply(&self) -> Result<HttpReply, TransportError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpReply::new(200, "{}")))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for RecordingTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        self.calls.borrow_mut().push(Recorded::Json { url: url.to_owned(), body: body.clone() });
        self.next_reply()
    }

    async fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpReply, TransportError> {
        self.calls.borrow_mut().push(Recorded::Multipart { url: url.to_owned(), form: form.clone() });
        self.next_reply()
    }
}
