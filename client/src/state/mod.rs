//! Reactive state shared through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` provides `RwSignal<GateState>` (written only by the session tracker
//! task) and `RwSignal<FileSelections>` (written only by the upload page's
//! pickers). Everything else reads them.

pub mod session;
