//! Upload page: one picker + upload button per category, and logout.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use courier::notice::{AuthAction, Notice};
use courier::upload::FileSelections;
use courier::{ClientError, GateState, IdentityProvider, SelectedFile, UploadCategory, submit};
use leptos::prelude::*;

use crate::app::ClientContext;
use crate::net::transport::BrowserTransport;
use crate::state::session::welcome_text;
use crate::util::{file_input, notify};

#[must_use]
pub fn section_title(category: UploadCategory) -> &'static str {
    match category {
        UploadCategory::File => "Upload a JSON File",
        UploadCategory::Image => "Upload Image/PDF",
    }
}

#[must_use]
pub fn button_label(category: UploadCategory) -> &'static str {
    match category {
        UploadCategory::File => "Upload File",
        UploadCategory::Image => "Upload Image",
    }
}

/// Short description of the current selection.
#[must_use]
pub fn selection_summary(file: Option<&SelectedFile>) -> String {
    match file {
        Some(file) => format!("{} ({} bytes)", file.name, file.len()),
        None => "No file chosen".to_owned(),
    }
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let ctx = expect_context::<ClientContext>();
    let gate = expect_context::<RwSignal<GateState>>();

    let logout = move |_| {
        let auth = ctx.auth.clone();
        leptos::task::spawn_local(async move {
            let result = auth.sign_out().await.map_err(ClientError::from);
            notify::show(Notice::for_auth(AuthAction::SignOut, &result));
        });
    };

    view! {
        <div class="upload-page">
            <p class="upload-page__welcome">{move || gate.with(welcome_text)}</p>
            <button class="upload-page__logout" on:click=logout>
                "Logout"
            </button>
            {UploadCategory::ALL
                .into_iter()
                .map(|category| view! { <UploadSection category=category /> })
                .collect_view()}
        </div>
    }
}

#[component]
fn UploadSection(category: UploadCategory) -> impl IntoView {
    let ctx = expect_context::<ClientContext>();
    let gate = expect_context::<RwSignal<GateState>>();
    let selections = expect_context::<RwSignal<FileSelections>>();
    let busy = RwSignal::new(false);

    let on_change = move |ev: leptos::ev::Event| {
        leptos::task::spawn_local(async move {
            match file_input::read_from_event(&ev).await {
                Ok(file) => selections.update(|s| {
                    s.select(category, file);
                }),
                Err(message) => notify::show(Some(Notice::error(message))),
            }
        });
    };

    let on_upload = move |_| {
        if busy.get_untracked() {
            return;
        }
        let file = selections.with_untracked(|s| s.get(category).cloned());
        let identity = gate.with_untracked(|g| g.identity().cloned());
        let endpoint = ctx.config.upload_endpoint.clone();
        busy.set(true);
        leptos::task::spawn_local(async move {
            let outcome = submit(&BrowserTransport, file.as_ref(), identity.as_ref(), &endpoint).await;
            notify::show(Some(Notice::for_upload(category, &outcome)));
            busy.set(false);
        });
    };

    view! {
        <section class="upload-section">
            <h2>{section_title(category)}</h2>
            <input type="file" accept=category.accept() on:change=on_change />
            <p class="upload-section__selection">
                {move || selections.with(|s| selection_summary(s.get(category)))}
            </p>
            <button class="upload-section__button" on:click=on_upload disabled=move || busy.get()>
                {button_label(category)}
            </button>
        </section>
    }
}
