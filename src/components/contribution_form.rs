//! Contribution Form Component
//!
//! Modal form for adding or editing a contribution. A new contribution is
//! handed to the tracker and the modal closes at once; the row shows up
//! immediately and is rolled back if the save fails.

use capital_core::domain::{ContributionForm as FormInput, ContributionPatch, FormErrors};
use capital_core::suggest::is_failure_text;
use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::store::{AppStateStoreFields, EditorTarget};

#[component]
pub fn ContributionForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let form = RwSignal::new(FormInput::default());
    let errors = RwSignal::new(FormErrors::default());
    let suggesting = RwSignal::new(false);
    let suggestion_note = RwSignal::new(None::<String>);

    // Reset the form whenever the editor opens; opening and closing both
    // acknowledge earlier failures
    Effect::new(move |_| {
        let target = store.editor().get();
        ctx.services().tracker.contributions.clear_errors();
        errors.set(FormErrors::default());
        suggestion_note.set(None);
        match target {
            Some(EditorTarget::New) => form.set(FormInput::blank(Local::now().date_naive())),
            Some(EditorTarget::Existing(id)) => {
                match ctx.services().tracker.contributions.get(&id) {
                    Some(existing) => form.set(FormInput::from_contribution(&existing)),
                    None => store.editor().set(None),
                }
            }
            None => {}
        }
    });

    let close = move || store.editor().set(None);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = match form.get_untracked().validate() {
            Ok(draft) => draft,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        let Some(target) = store.editor().get_untracked() else {
            return;
        };
        close();

        let services = ctx.services();
        spawn_local(async move {
            let contributions = &services.tracker.contributions;
            let outcome = match target {
                EditorTarget::New => contributions.add(draft).await.map(|_| "Contribution added."),
                EditorTarget::Existing(id) => contributions
                    .update(&id, ContributionPatch::from_draft(&draft))
                    .await
                    .map(|_| "Contribution updated."),
            };
            match outcome {
                Ok(message) => ctx.notify_success(message),
                Err(e) => ctx.notify_error(&e),
            }
        });
    };

    let suggest = move |_| {
        let input = form.get_untracked();
        let Some(amount) = input.parsed_amount().filter(|a| *a > 0.0) else {
            suggestion_note.set(Some("Enter an amount first.".to_string()));
            return;
        };
        let name = ctx.services().tracker.contributors.name_of(&input.contributor_id);
        let suggester = ctx.services().suggester.clone();
        suggesting.set(true);
        spawn_local(async move {
            let text = suggester.suggest(amount, &name).await;
            if is_failure_text(&text) {
                suggestion_note.set(Some(text));
            } else {
                form.update(|f| f.comment = text);
                suggestion_note.set(None);
            }
            suggesting.set(false);
        });
    };

    let is_editing = move || matches!(store.editor().get(), Some(EditorTarget::Existing(_)));
    let field_error = move |pick: fn(&FormErrors) -> Option<String>| {
        move || errors.with(pick).map(|msg| view! { <p class="field-error">{msg}</p> })
    };

    view! {
        <Show when=move || store.editor().get().is_some()>
            <div class="modal-backdrop" on:click=move |_| close()>
                <div class="modal" on:click=|ev| ev.stop_propagation()>
                    <h2>{move || if is_editing() { "Edit Contribution" } else { "Add Contribution" }}</h2>
                    <form class="contribution-form" on:submit=submit>
                        <label>
                            "Contributor"
                            <select
                                disabled=is_editing
                                prop:value=move || form.with(|f| f.contributor_id.clone())
                                on:change=move |ev| form.update(|f| f.contributor_id = event_target_value(&ev))
                            >
                                <option value="">"Select a contributor"</option>
                                {move || {
                                    store
                                        .contributors()
                                        .get()
                                        .into_iter()
                                        .map(|c| view! { <option value=c.id.clone()>{c.name}</option> })
                                        .collect_view()
                                }}
                            </select>
                        </label>
                        {field_error(|e| e.contributor_id.clone())}

                        <label>
                            "Date"
                            <input
                                type="date"
                                prop:value=move || form.with(|f| f.contributed_at.clone())
                                on:input=move |ev| form.update(|f| f.contributed_at = event_target_value(&ev))
                            />
                        </label>
                        {field_error(|e| e.contributed_at.clone())}

                        <label>
                            "Amount (USD)"
                            <input
                                type="number"
                                step="0.01"
                                min="0"
                                prop:value=move || form.with(|f| f.amount.clone())
                                on:input=move |ev| form.update(|f| f.amount = event_target_value(&ev))
                            />
                        </label>
                        {field_error(|e| e.amount.clone())}

                        <label>
                            "Comment"
                            <textarea
                                prop:value=move || form.with(|f| f.comment.clone())
                                on:input=move |ev| form.update(|f| f.comment = event_target_value(&ev))
                            ></textarea>
                        </label>
                        <div class="suggest-row">
                            <button type="button" class="secondary-btn" disabled=move || suggesting.get() on:click=suggest>
                                {move || if suggesting.get() { "Thinking..." } else { "Suggest with AI" }}
                            </button>
                            {move || suggestion_note.get().map(|note| view! { <span class="suggest-note">{note}</span> })}
                        </div>

                        <div class="modal-actions">
                            <button type="button" class="secondary-btn" on:click=move |_| close()>
                                "Cancel"
                            </button>
                            <button type="submit" class="primary-btn">
                                {move || if is_editing() { "Save Changes" } else { "Add Contribution" }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
