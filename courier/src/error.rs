//! Error taxonomy for user-triggered actions.
//!
//! Every variant is terminal for the action that raised it; nothing here is
//! retried. Hosts turn these into a [`crate::notice::Notice`] at the
//! user-action boundary.

use crate::identity::AuthError;
use crate::transport::TransportError;

const UNKNOWN_FAILURE: &str = "unknown error";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Upload pressed with no file chosen. No request was made.
    #[error("no file selected")]
    NoFileSelected,
    /// Upload pressed while signed out. No request was made.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The identity provider rejected an operation.
    #[error("{0}")]
    AuthProvider(String),
    /// The request failed, or its response could not be interpreted.
    #[error("{0}")]
    NetworkOrParse(String),
}

impl ClientError {
    /// Build a [`ClientError::NetworkOrParse`], never with an empty message.
    #[must_use]
    pub fn network_or_parse(message: impl Into<String>) -> Self {
        Self::NetworkOrParse(non_empty(message.into()))
    }

    /// Build a [`ClientError::AuthProvider`], never with an empty message.
    #[must_use]
    pub fn auth_provider(message: impl Into<String>) -> Self {
        Self::AuthProvider(non_empty(message.into()))
    }

    /// Whether the failure happened before any request was sent.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoFileSelected | Self::NotAuthenticated)
    }
}

impl From<AuthError> for ClientError {
    fn from(error: AuthError) -> Self {
        Self::auth_provider(error.message)
    }
}

impl From<TransportError> for ClientError {
    fn from(error: TransportError) -> Self {
        Self::network_or_parse(error.0)
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() { UNKNOWN_FAILURE.to_owned() } else { message }
}
