//! Confirm Dialog Component
//!
//! Second step of a delete: shows the prompt for the pending request and
//! confirms or cancels it by token.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn ConfirmDialog() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let cancel = move || {
        if let Some(request) = store.pending_delete().get_untracked() {
            ctx.services().tracker.contributions.cancel_delete(request.token);
        }
        store.pending_delete().set(None);
    };

    let confirm = move || {
        let Some(request) = store.pending_delete().get_untracked() else {
            return;
        };
        store.pending_delete().set(None);
        let services = ctx.services();
        spawn_local(async move {
            match services.tracker.contributions.confirm_delete(request.token).await {
                Ok(()) => ctx.notify_success("Contribution deleted."),
                Err(e) => ctx.notify_error(&e),
            }
        });
    };

    move || {
        store.pending_delete().get().map(|request| {
            let prompt = request.prompt;
            view! {
                <div class="modal-backdrop" on:click=move |_| cancel()>
                    <div class="modal alert-dialog" role="alertdialog" on:click=|ev| ev.stop_propagation()>
                        <h2>{prompt.title}</h2>
                        <p>{prompt.description}</p>
                        <div class="modal-actions">
                            <button class="secondary-btn" on:click=move |_| cancel()>
                                "Cancel"
                            </button>
                            <button class="danger-btn" on:click=move |_| confirm()>
                                {prompt.confirm_label}
                            </button>
                        </div>
                    </div>
                </div>
            }
        })
    }
}
