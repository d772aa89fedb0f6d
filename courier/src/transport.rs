//! HTTP seam shared by the identity adapter and the upload submitter.
//!
//! SYSTEM CONTEXT
//! ==============
//! The CLI implements [`HttpTransport`] with `reqwest`, the browser client with
//! `gloo-net` + `FormData`. Both return the raw status and body; callers own
//! response interpretation so it stays testable without a network.

use serde_json::Value;

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not be sent or its response could not be read.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One field of a `multipart/form-data` body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file_name: String, media_type: String, bytes: Vec<u8> },
}

impl FormPart {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Transport-neutral multipart body. Field order is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text { name: name.into(), value: value.into() });
        self
    }

    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        });
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.parts.iter().map(FormPart::name).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|part| part.name() == name)
    }
}

/// Outbound HTTP used by provider adapters and the upload submitter.
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request cannot be completed.
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError>;

    /// POST a `multipart/form-data` body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request cannot be completed.
    async fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpReply, TransportError>;
}
