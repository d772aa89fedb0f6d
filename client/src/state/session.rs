//! Session gate state for the root view.
//!
//! DESIGN
//! ======
//! One `SessionTracker` per mounted root. Its `run` loop is spawned as a
//! local task that copies every gate change into a signal; the task is
//! aborted on cleanup, which drops the tracker and releases the provider
//! subscription exactly once.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use courier::{GateState, IdentityProvider, SessionTracker};
use futures::FutureExt;
use futures::future::{AbortHandle, LocalBoxFuture, abortable};
use leptos::prelude::*;

/// Which screen the root renders for a gate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootView {
    Loading,
    Auth,
    Upload,
}

impl RootView {
    #[must_use]
    pub fn for_gate(gate: &GateState) -> Self {
        match gate {
            GateState::Loading => Self::Loading,
            GateState::Unauthenticated => Self::Auth,
            GateState::Authenticated(_) => Self::Upload,
        }
    }
}

/// Welcome line for the upload page.
#[must_use]
pub fn welcome_text(gate: &GateState) -> String {
    match gate.identity() {
        Some(identity) => format!("Welcome, {}", identity.display_name()),
        None => String::new(),
    }
}

/// Subscribe to `provider` and build the task that mirrors gate changes into
/// `gate`. The caller spawns the future; aborting the handle releases the
/// subscription.
pub fn session_task<P>(provider: &P, gate: RwSignal<GateState>) -> (LocalBoxFuture<'static, ()>, AbortHandle)
where
    P: IdentityProvider + ?Sized,
{
    let tracker = SessionTracker::start(provider);
    let (task, handle) = abortable(tracker.run(move |state| gate.set(state.clone())));
    let task = async move {
        if task.await.is_err() {
            log_debug("session tracker aborted");
        }
    };
    (task.boxed_local(), handle)
}

/// Start the session tracker for the mounted root and restore the persisted
/// session. Must be called inside a reactive owner.
pub fn spawn_session_tracker(auth: &crate::net::auth::BrowserAuth, gate: RwSignal<GateState>) {
    let (task, handle) = session_task(auth, gate);
    leptos::task::spawn_local(task);
    auth.restore();
    on_cleanup(move || handle.abort());
}

fn log_debug(message: &str) {
    #[cfg(feature = "csr")]
    log::debug!("{message}");
    #[cfg(not(feature = "csr"))]
    let _ = message;
}
