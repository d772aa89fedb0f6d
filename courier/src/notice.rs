//! User-facing notices for the outcome of each user action.
//!
//! Hosts map an action's result to a [`Notice`] at the boundary where the
//! user triggered it, then hand it to whatever [`Notifier`] they use (stdout,
//! a log line, a blocking browser alert).

use std::fmt;

use crate::error::ClientError;
use crate::upload::{UploadCategory, UploadOutcome};

const NOT_LOGGED_IN: &str = "You must be logged in.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message shown to the user after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Authentication actions a user can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthAction {
    SignUp,
    SignIn,
    GoogleSignIn,
    SignOut,
}

impl AuthAction {
    fn success_message(self) -> Option<&'static str> {
        match self {
            Self::SignUp => Some("Sign-up successful!"),
            Self::SignIn => Some("Sign-in successful!"),
            // The gate switching to the upload page is the only feedback.
            Self::GoogleSignIn => None,
            Self::SignOut => Some("Logged out"),
        }
    }
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Notice for an authentication action, or `None` when a success is
    /// silent.
    #[must_use]
    pub fn for_auth<T>(action: AuthAction, result: &Result<T, ClientError>) -> Option<Self> {
        match result {
            Ok(_) => action.success_message().map(Self::info),
            Err(error) => Some(Self::error(format!("Error: {error}"))),
        }
    }

    /// Notice for a finished upload attempt in `category`.
    #[must_use]
    pub fn for_upload(category: UploadCategory, outcome: &UploadOutcome) -> Self {
        match outcome {
            Ok(receipt) => Self::info(format!("Upload successful! URL:\n{}", receipt.url)),
            Err(ClientError::NoFileSelected) => Self::error(category.choose_prompt()),
            Err(ClientError::NotAuthenticated) => Self::error(NOT_LOGGED_IN),
            Err(error) => Self::error(format!("Upload failed: {error}")),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// =============================================================================
// NOTIFIER
// =============================================================================

/// Sink that surfaces notices to the user.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

impl<F> Notifier for F
where
    F: Fn(&Notice),
{
    fn notify(&self, notice: &Notice) {
        self(notice);
    }
}

/// Notifier that writes notices as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}
