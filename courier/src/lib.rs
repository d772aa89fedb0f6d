//! Session-gated upload core shared by the `uplink` CLI and the browser client.
//!
//! This crate owns everything that does not depend on a concrete HTTP stack
//! or storage backend: the identity model, the provider-side identity hub,
//! the session tracker that turns identity events into a gate state, and the
//! guarded upload submitter. Hosts plug in an [`transport::HttpTransport`] and
//! a [`store::SessionStore`]; the crate compiles natively and for `wasm32`.

pub mod config;
pub mod error;
pub mod firebase;
pub mod identity;
pub mod media;
pub mod notice;
pub mod session;
pub mod store;
pub mod transport;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::ClientError;
pub use identity::{Identity, IdentityProvider};
pub use session::{GateState, SessionTracker};
pub use upload::{SelectedFile, UploadCategory, UploadOutcome, UploadReceipt, submit};
