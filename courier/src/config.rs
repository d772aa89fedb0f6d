//! Client configuration parsed from environment-like lookups.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::time::Duration;

use crate::firebase::FirebaseConfig;

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "http://localhost:8080/upload";
pub const DEFAULT_GOOGLE_REDIRECT_URI: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub identity_base_url: String,
    pub upload_endpoint: String,
    pub upload_timeout: Option<Duration>,
    pub google_client_id: Option<String>,
    pub google_redirect_uri: String,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Required:
    /// - `FIREBASE_API_KEY`
    ///
    /// Optional:
    /// - `IDENTITY_BASE_URL`: Identity Toolkit base, default Google's hosted API
    /// - `UPLOAD_ENDPOINT`: default `http://localhost:8080/upload`
    /// - `UPLOAD_TIMEOUT_SECS`: unset or `0` disables the timeout
    /// - `GOOGLE_CLIENT_ID`: enables the browser Google redirect
    /// - `GOOGLE_REDIRECT_URI`: default `http://localhost:8080`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the API key is missing or a value does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_key = get("FIREBASE_API_KEY").ok_or(ConfigError::Missing("FIREBASE_API_KEY"))?;
        let identity_base_url = get("IDENTITY_BASE_URL")
            .unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let upload_endpoint = get("UPLOAD_ENDPOINT").unwrap_or_else(|| DEFAULT_UPLOAD_ENDPOINT.to_owned());
        let upload_timeout = match get("UPLOAD_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid { key: "UPLOAD_TIMEOUT_SECS", value: raw.clone() })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };
        let google_client_id = get("GOOGLE_CLIENT_ID");
        let google_redirect_uri = get("GOOGLE_REDIRECT_URI").unwrap_or_else(|| DEFAULT_GOOGLE_REDIRECT_URI.to_owned());

        Ok(Self { api_key, identity_base_url, upload_endpoint, upload_timeout, google_client_id, google_redirect_uri })
    }

    /// Identity Toolkit settings derived from this config.
    #[must_use]
    pub fn firebase(&self) -> FirebaseConfig {
        FirebaseConfig {
            api_key: self.api_key.clone(),
            base_url: self.identity_base_url.clone(),
            request_uri: self.google_redirect_uri.clone(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("identity_base_url", &self.identity_base_url)
            .field("upload_endpoint", &self.upload_endpoint)
            .field("upload_timeout", &self.upload_timeout)
            .field("google_client_id", &self.google_client_id)
            .field("google_redirect_uri", &self.google_redirect_uri)
            .finish()
    }
}
