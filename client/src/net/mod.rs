//! Browser implementations of the `courier` seams.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each module has a real `csr` body and a native fallback that fails
//! cleanly, mirroring how the pages compile outside the browser.

pub mod auth;
pub mod store;
pub mod transport;
