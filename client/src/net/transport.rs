//! `gloo-net` implementation of [`HttpTransport`].
//!
//! Multipart bodies are built as a browser `FormData`, so the browser picks
//! the boundary and the file part keeps its name and media type.

#![allow(clippy::unused_async)]

use courier::transport::{HttpReply, HttpTransport, MultipartForm, TransportError};
use serde_json::Value;

#[cfg(not(feature = "csr"))]
const UNAVAILABLE: &str = "network requests are only available in the browser";

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[cfg(feature = "csr")]
fn js_error(error: &wasm_bindgen::JsValue) -> TransportError {
    TransportError::new(error.as_string().unwrap_or_else(|| format!("{error:?}")))
}

#[cfg(feature = "csr")]
fn to_form_data(form: &MultipartForm) -> Result<web_sys::FormData, TransportError> {
    use courier::transport::FormPart;

    let data = web_sys::FormData::new().map_err(|e| js_error(&e))?;
    for part in form.parts() {
        match part {
            FormPart::Text { name, value } => data.append_with_str(name, value).map_err(|e| js_error(&e))?,
            FormPart::File { name, file_name, media_type, bytes } => {
                let chunks = js_sys::Array::new();
                chunks.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(media_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&chunks, &options)
                    .map_err(|e| js_error(&e))?;
                data.append_with_blob_and_filename(name, &blob, file_name).map_err(|e| js_error(&e))?;
            }
        }
    }
    Ok(data)
}

#[cfg(feature = "csr")]
async fn finish(response: gloo_net::http::Response) -> Result<HttpReply, TransportError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| TransportError::new(e.to_string()))?;
    Ok(HttpReply::new(status, body))
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for BrowserTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        #[cfg(feature = "csr")]
        {
            let response = gloo_net::http::Request::post(url)
                .json(body)
                .map_err(|e| TransportError::new(e.to_string()))?
                .send()
                .await
                .map_err(|e| TransportError::new(e.to_string()))?;
            finish(response).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (url, body);
            Err(TransportError::new(UNAVAILABLE))
        }
    }

    async fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpReply, TransportError> {
        #[cfg(feature = "csr")]
        {
            let data = to_form_data(form)?;
            let response = gloo_net::http::Request::post(url)
                .body(data)
                .map_err(|e| TransportError::new(e.to_string()))?
                .send()
                .await
                .map_err(|e| TransportError::new(e.to_string()))?;
            finish(response).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (url, form);
            Err(TransportError::new(UNAVAILABLE))
        }
    }
}
