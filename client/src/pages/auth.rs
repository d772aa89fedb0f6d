//! Sign-up / sign-in page with email + password and Google.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use courier::notice::{AuthAction, Notice};
use courier::{ClientError, IdentityProvider};
use leptos::prelude::*;

use crate::app::ClientContext;
use crate::net::auth::begin_google_redirect;
use crate::util::notify;

/// Email is trimmed; the password is sent exactly as typed.
#[must_use]
pub fn credentials_input(email: &str, password: &str) -> (String, String) {
    (email.trim().to_owned(), password.to_owned())
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let ctx = expect_context::<ClientContext>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let run_password_action = {
        let ctx = ctx.clone();
        move |action: AuthAction| {
            if busy.get_untracked() {
                return;
            }
            let (email_value, password_value) = credentials_input(&email.get_untracked(), &password.get_untracked());
            let auth = ctx.auth.clone();
            busy.set(true);
            leptos::task::spawn_local(async move {
                let result = match action {
                    AuthAction::SignUp => auth.sign_up(&email_value, &password_value).await,
                    _ => auth.sign_in(&email_value, &password_value).await,
                };
                let result = result.map_err(ClientError::from);
                notify::show(Notice::for_auth(action, &result));
                busy.set(false);
            });
        }
    };
    let sign_up = {
        let run = run_password_action.clone();
        move |_| run(AuthAction::SignUp)
    };
    let sign_in = move |_| run_password_action(AuthAction::SignIn);

    let google = move |_| {
        if let Err(message) = begin_google_redirect(&ctx.config) {
            let result: Result<(), ClientError> = Err(ClientError::auth_provider(message));
            notify::show(Notice::for_auth(AuthAction::GoogleSignIn, &result));
        }
    };

    view! {
        <div class="auth-page">
            <h2>"Sign Up / Sign In"</h2>
            <input
                class="auth-input"
                type="email"
                placeholder="Email"
                prop:value=move || email.get()
                on:input=move |ev| email.set(event_target_value(&ev))
            />
            <input
                class="auth-input"
                type="password"
                placeholder="Password"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />
            <div class="auth-actions">
                <button class="auth-button" on:click=sign_up disabled=move || busy.get()>
                    "Sign Up"
                </button>
                <button class="auth-button" on:click=sign_in disabled=move || busy.get()>
                    "Sign In"
                </button>
                <button class="auth-button auth-button--google" on:click=google disabled=move || busy.get()>
                    "Sign In with Google"
                </button>
            </div>
        </div>
    }
}
