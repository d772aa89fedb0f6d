//! Browser client: sign in, then upload files under your user id.
//!
//! ARCHITECTURE
//! ============
//! `courier` owns the workflow. This crate provides the browser halves of its
//! seams (`gloo-net` transport, `localStorage` session store, `alert`
//! notifier) and the Leptos views. Browser-only bodies sit behind the `csr`
//! feature with inert fallbacks so the crate also builds and tests natively.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

pub use app::App;

/// WASM entry point: install logging and mount the root view.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
