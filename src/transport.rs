//! `reqwest` implementation of [`HttpTransport`].

use std::time::Duration;

use courier::transport::{FormPart, HttpReply, HttpTransport, MultipartForm, TransportError};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport, optionally bounding every request by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the TLS backend cannot be initialized.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransportError::new(e.to_string()))?;
        Ok(Self { client })
    }

    async fn finish(response: reqwest::Response) -> Result<HttpReply, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(describe)?;
        Ok(HttpReply::new(status, body))
    }
}

/// Build a `reqwest` multipart body from the transport-neutral form.
///
/// # Errors
///
/// Returns [`TransportError`] when a file part carries an unparsable media type.
pub fn to_reqwest_form(form: &MultipartForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for part in form.parts() {
        out = match part {
            FormPart::Text { name, value } => out.text(name.clone(), value.clone()),
            FormPart::File { name, file_name, media_type, bytes } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(media_type)
                    .map_err(|e| TransportError::new(format!("invalid media type '{media_type}': {e}")))?;
                out.part(name.clone(), part)
            }
        };
    }
    Ok(out)
}

fn describe(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::new("request timed out")
    } else if error.is_connect() {
        TransportError::new(format!("could not connect: {error}"))
    } else {
        TransportError::new(error.to_string())
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        let response = self.client.post(url).json(body).send().await.map_err(describe)?;
        Self::finish(response).await
    }

    async fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpReply, TransportError> {
        let multipart = to_reqwest_form(form)?;
        let response = self.client.post(url).multipart(multipart).send().await.map_err(describe)?;
        Self::finish(response).await
    }
}
