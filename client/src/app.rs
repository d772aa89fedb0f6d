//! Root component: provides shared state and renders the view for the
//! current session gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted once by `start`. Owns the session tracker task for the lifetime of
//! the mount, and finishes a pending Google redirect before the gate resolves.

use std::sync::Arc;

use courier::config::ClientConfig;
use courier::notice::{AuthAction, Notice};
use courier::upload::FileSelections;
use courier::{ClientError, GateState, IdentityProvider};
use leptos::prelude::*;

use crate::net::auth::{BrowserAuth, browser_auth, browser_config, take_redirect_credential};
use crate::pages::auth::AuthPage;
use crate::pages::upload::UploadPage;
use crate::state::session::{RootView, spawn_session_tracker};
use crate::util::notify;

/// Handles every page needs, provided through context.
#[derive(Clone)]
pub struct ClientContext {
    pub auth: Arc<BrowserAuth>,
    pub config: Arc<ClientConfig>,
}

#[component]
pub fn App() -> impl IntoView {
    let config = match browser_config() {
        Ok(config) => config,
        Err(e) => {
            return view! {
                <div class="config-error">{format!("Client is not configured: {e}")}</div>
            }
            .into_any();
        }
    };

    let ctx = ClientContext { auth: browser_auth(&config), config: Arc::new(config) };
    let gate = RwSignal::new(GateState::Loading);
    let selections = RwSignal::new(FileSelections::default());
    provide_context(ctx.clone());
    provide_context(gate);
    provide_context(selections);

    spawn_session_tracker(&ctx.auth, gate);

    match take_redirect_credential() {
        Ok(Some(credential)) => {
            let auth = ctx.auth.clone();
            leptos::task::spawn_local(async move {
                let result = auth.sign_in_with_google(&credential).await.map_err(ClientError::from);
                notify::show(Notice::for_auth(AuthAction::GoogleSignIn, &result));
            });
        }
        Ok(None) => {}
        Err(e) => notify::show(Notice::for_auth(AuthAction::GoogleSignIn, &Err::<(), _>(ClientError::from(e)))),
    }

    let root = Memo::new(move |_| RootView::for_gate(&gate.read()));

    view! {
        <div class="app">
            {move || match root.get() {
                RootView::Loading => view! { <p class="app__loading">"Loading..."</p> }.into_any(),
                RootView::Auth => view! { <AuthPage /> }.into_any(),
                RootView::Upload => view! { <UploadPage /> }.into_any(),
            }}
        </div>
    }
    .into_any()
}
