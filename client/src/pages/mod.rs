//! Screens selected by the root gate.
//!
//! ARCHITECTURE
//! ============
//! `App` renders exactly one of these for the current `RootView`. Pages own
//! the user-action boundary: they run the action, map its result to a
//! `Notice`, and hand it to the alert notifier.

pub mod auth;
pub mod upload;
