//! Settings Panel Component
//!
//! Backend credentials (kept in memory only), service status and the
//! contributor list.

use capital_core::config::{BackendConfig, ServiceStatus, StatusKind};
use capital_core::domain::{Contributor, ContributorPatch, NewContributor};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

fn status_class(status: &ServiceStatus) -> &'static str {
    match status.kind {
        StatusKind::Success => "status status-success",
        StatusKind::Error => "status status-error",
        StatusKind::Warning => "status status-warning",
        StatusKind::NotConfigured => "status status-muted",
    }
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[component]
pub fn SettingsPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let (url, set_url) = signal(String::new());
    let (anon_key, set_anon_key) = signal(String::new());
    let (gemini_key, set_gemini_key) = signal(String::new());
    let (new_name, set_new_name) = signal(String::new());
    let (new_email, set_new_email) = signal(String::new());
    let (new_picture, set_new_picture) = signal(String::new());

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let config = BackendConfig {
            supabase_url: non_empty(url.get_untracked()),
            supabase_anon_key: non_empty(anon_key.get_untracked()),
            gemini_api_key: non_empty(gemini_key.get_untracked()),
        };
        ctx.reconnect(&config);
    };

    let add_contributor = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = NewContributor {
            name: new_name.get_untracked(),
            email: non_empty(new_email.get_untracked()),
            profile_picture_url: non_empty(new_picture.get_untracked()),
        };
        let services = ctx.services();
        spawn_local(async move {
            match services.tracker.contributors.add(draft).await {
                Ok(added) => {
                    set_new_name.set(String::new());
                    set_new_email.set(String::new());
                    set_new_picture.set(String::new());
                    ctx.notify_success(format!("Added {}.", added.name));
                }
                Err(e) => ctx.notify_error(&e),
            }
        });
    };

    let status_line = move |status: Option<ServiceStatus>| {
        status.map(|s| {
            let class = status_class(&s);
            view! { <p class=class>{s.message}</p> }
        })
    };

    view! {
        <Show when=move || store.settings_open().get()>
            <div class="modal-backdrop" on:click=move |_| store.settings_open().set(false)>
                <div class="modal settings" on:click=|ev| ev.stop_propagation()>
                    <h2>"Settings"</h2>

                    <form on:submit=save>
                        <h3>"Supabase"</h3>
                        {move || status_line(store.supabase_status().get())}
                        <input
                            type="url"
                            placeholder="https://your-project.supabase.co"
                            prop:value=move || url.get()
                            on:input=move |ev| set_url.set(event_target_value(&ev))
                        />
                        <input
                            type="password"
                            placeholder="Anon key"
                            prop:value=move || anon_key.get()
                            on:input=move |ev| set_anon_key.set(event_target_value(&ev))
                        />

                        <h3>"API Key"</h3>
                        {move || status_line(store.gemini_status().get())}
                        <input
                            type="password"
                            placeholder="Gemini API key"
                            prop:value=move || gemini_key.get()
                            on:input=move |ev| set_gemini_key.set(event_target_value(&ev))
                        />
                        <button type="submit" class="primary-btn">"Apply"</button>
                    </form>

                    <h3>"Contributors"</h3>
                    <ul class="contributor-list">
                        <For
                            each=move || store.contributors().get()
                            key=|c| {
                                (c.id.clone(), c.name.clone(), c.email.clone(), c.profile_picture_url.clone())
                            }
                            children=move |c| view! { <ContributorRow contributor=c /> }
                        />
                    </ul>
                    <form class="new-contributor-form" on:submit=add_contributor>
                        <input
                            type="text"
                            placeholder="New contributor name"
                            prop:value=move || new_name.get()
                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        />
                        <input
                            type="email"
                            placeholder="Email (optional)"
                            prop:value=move || new_email.get()
                            on:input=move |ev| set_new_email.set(event_target_value(&ev))
                        />
                        <input
                            type="url"
                            placeholder="Profile picture URL (optional)"
                            prop:value=move || new_picture.get()
                            on:input=move |ev| set_new_picture.set(event_target_value(&ev))
                        />
                        <button type="submit">"Add"</button>
                    </form>

                    <div class="modal-actions">
                        <button class="secondary-btn" on:click=move |_| store.settings_open().set(false)>
                            "Close"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}

/// One contributor with an inline edit form
#[component]
fn ContributorRow(contributor: Contributor) -> impl IntoView {
    let ctx = use_app_context();
    let (editing, set_editing) = signal(false);
    let (name, set_name) = signal(contributor.name.clone());
    let (email, set_email) = signal(contributor.email.clone().unwrap_or_default());
    let (picture, set_picture) = signal(contributor.profile_picture_url.clone().unwrap_or_default());

    let id = contributor.id.clone();
    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let patch = ContributorPatch {
            name: Some(name.get_untracked()),
            email: Some(non_empty(email.get_untracked())),
            profile_picture_url: Some(non_empty(picture.get_untracked())),
        };
        let id = id.clone();
        let services = ctx.services();
        spawn_local(async move {
            match services.tracker.contributors.update(&id, patch).await {
                Ok(updated) => {
                    set_editing.set(false);
                    ctx.notify_success(format!("Updated {}.", updated.name));
                }
                Err(e) => ctx.notify_error(&e),
            }
        });
    };

    let Contributor { name: display_name, email: display_email, .. } = contributor.clone();
    let initials = contributor.initials();

    view! {
        <li>
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <span class="avatar avatar-initials">{initials.clone()}</span>
                        {display_name.clone()}
                        {display_email.clone().map(|email| view! { <span class="email">{email}</span> })}
                        <button class="link-btn" on:click=move |_| set_editing.set(true)>"Edit"</button>
                    }
                }
            >
                <form class="edit-contributor-form" on:submit=save.clone()>
                    <input
                        type="text"
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                    <input
                        type="email"
                        placeholder="Email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <input
                        type="url"
                        placeholder="Profile picture URL"
                        prop:value=move || picture.get()
                        on:input=move |ev| set_picture.set(event_target_value(&ev))
                    />
                    <button type="submit">"Save"</button>
                    <button type="button" on:click=move |_| set_editing.set(false)>"Cancel"</button>
                </form>
            </Show>
        </li>
    }
}
