//! Browser helpers shared by the pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! These modules isolate `web-sys` glue so pages stay plain Leptos.

pub mod file_input;
pub mod notify;
