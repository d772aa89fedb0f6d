//! Guarded upload submission.
//!
//! DESIGN
//! ======
//! [`submit`] is the whole workflow: check preconditions, build one
//! multipart body (`file` + `uid`), send exactly one POST, interpret the
//! reply. It returns a typed outcome and never notifies anyone; hosts decide
//! how to surface the result.
//!
//! TRADE-OFFS
//! ==========
//! Single best-effort attempt: no retry, no resumption. The identity is
//! copied into the form before the request starts, so a sign-out while the
//! request is in flight does not change what was sent.

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::identity::Identity;
use crate::media;
use crate::transport::{HttpReply, HttpTransport, MultipartForm};

/// Multipart field carrying the file bytes.
pub const FILE_FIELD: &str = "file";
/// Multipart field carrying the uploader's uid.
pub const UID_FIELD: &str = "uid";

const MAX_ERROR_BODY_CHARS: usize = 200;

// =============================================================================
// SELECTION
// =============================================================================

/// Upload slot on the upload screen. Each slot tracks its own selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadCategory {
    /// Generic data file (the picker offers `.json`).
    File,
    /// Image or PDF document.
    Image,
}

impl UploadCategory {
    pub const ALL: [Self; 2] = [Self::File, Self::Image];

    /// HTML `accept` attribute for this slot's picker.
    #[must_use]
    pub fn accept(self) -> &'static str {
        match self {
            Self::File => ".json",
            Self::Image => "image/*,application/pdf",
        }
    }

    /// Prompt shown when upload is pressed with nothing selected.
    #[must_use]
    pub fn choose_prompt(self) -> &'static str {
        match self {
            Self::File => "Choose a file first.",
            Self::Image => "Choose an image first.",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Image => "image",
        }
    }

    /// Whether `file` matches this slot's picker filter.
    #[must_use]
    pub fn accepts(self, file: &SelectedFile) -> bool {
        media::accepts(self.accept(), &file.name, &file.media_type)
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UploadCategory {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "image" => Ok(Self::Image),
            other => Err(format!("unknown upload category '{other}' (expected 'file' or 'image')")),
        }
    }
}

/// A user-chosen local file.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), media_type: media_type.into(), bytes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// At most one selected file per [`UploadCategory`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSelections {
    file: Option<SelectedFile>,
    image: Option<SelectedFile>,
}

impl FileSelections {
    /// Replace the selection for `category`, returning the previous one.
    pub fn select(&mut self, category: UploadCategory, file: Option<SelectedFile>) -> Option<SelectedFile> {
        std::mem::replace(self.slot_mut(category), file)
    }

    #[must_use]
    pub fn get(&self, category: UploadCategory) -> Option<&SelectedFile> {
        match category {
            UploadCategory::File => self.file.as_ref(),
            UploadCategory::Image => self.image.as_ref(),
        }
    }

    fn slot_mut(&mut self, category: UploadCategory) -> &mut Option<SelectedFile> {
        match category {
            UploadCategory::File => &mut self.file,
            UploadCategory::Image => &mut self.image,
        }
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Successful upload response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    /// Locator of the stored resource.
    pub url: String,
}

pub type UploadOutcome = Result<UploadReceipt, ClientError>;

// =============================================================================
// SUBMISSION
// =============================================================================

/// Build the two-field upload body for `file` owned by `identity`.
#[must_use]
pub fn build_upload_form(file: &SelectedFile, identity: &Identity) -> MultipartForm {
    MultipartForm::new()
        .file(FILE_FIELD, file.name.clone(), file.media_type.clone(), file.bytes.clone())
        .text(UID_FIELD, identity.uid.clone())
}

/// Upload `file` to `endpoint` under `identity`.
///
/// Sends nothing unless both a file and an identity are present.
///
/// # Errors
///
/// - [`ClientError::NoFileSelected`] when `file` is `None`
/// - [`ClientError::NotAuthenticated`] when `identity` is `None`
/// - [`ClientError::NetworkOrParse`] for transport failures and unusable replies
pub async fn submit<T>(
    transport: &T,
    file: Option<&SelectedFile>,
    identity: Option<&Identity>,
    endpoint: &str,
) -> UploadOutcome
where
    T: HttpTransport + ?Sized,
{
    let file = file.ok_or(ClientError::NoFileSelected)?;
    let identity = identity.ok_or(ClientError::NotAuthenticated)?;

    let form = build_upload_form(file, identity);
    tracing::info!(uid = %identity.uid, endpoint, file = %file.name, bytes = file.len(), "submitting upload");

    let reply = transport.post_multipart(endpoint, &form).await.map_err(|e| {
        tracing::warn!(error = %e, endpoint, "upload request failed");
        ClientError::from(e)
    })?;
    tracing::debug!(status = reply.status, "upload reply received");
    parse_upload_reply(&reply)
}

/// Interpret the upload endpoint's reply.
///
/// A JSON body with a string `url` is a success whatever the status; the
/// status only shapes the failure message otherwise.
///
/// # Errors
///
/// Returns [`ClientError::NetworkOrParse`] when the body carries no string
/// `url`: non-2xx statuses report the status, 2xx bodies that are not JSON or
/// lack the field report that.
pub fn parse_upload_reply(reply: &HttpReply) -> UploadOutcome {
    let parsed = serde_json::from_str::<Value>(&reply.body);

    let url = match &parsed {
        Ok(value) => value.get("url").and_then(Value::as_str),
        Err(_) => None,
    };
    if let Some(url) = url {
        if !reply.is_success() {
            tracing::warn!(status = reply.status, "upload reply carried a url despite its status");
        }
        return Ok(UploadReceipt { url: url.to_owned() });
    }

    if !reply.is_success() {
        let detail = match &parsed {
            Ok(value) => value
                .get("error")
                .and_then(Value::as_str)
                .map_or_else(|| value.to_string(), str::to_owned),
            Err(_) => truncate(reply.body.trim(), MAX_ERROR_BODY_CHARS),
        };
        let message = if detail.is_empty() {
            format!("server returned status {}", reply.status)
        } else {
            format!("server returned status {}: {detail}", reply.status)
        };
        return Err(ClientError::network_or_parse(message));
    }

    match parsed {
        Ok(_) => Err(ClientError::network_or_parse("response did not include a `url` field")),
        Err(e) => Err(ClientError::network_or_parse(format!("invalid JSON response: {e}"))),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
