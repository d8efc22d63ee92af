//! Contribution Table Component
//!
//! Searchable, filterable, sortable list of contributions. Rows with a
//! write in flight are dimmed and cannot be edited; rows whose last write
//! failed are flagged.

use capital_core::domain::{Contribution, DATE_FORMAT, UNKNOWN_CONTRIBUTOR};
use capital_core::format::format_usd;
use capital_core::table::{SortDirection, SortKey};
use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields, EditorTarget};

const COLUMNS: &[(SortKey, &str)] = &[
    (SortKey::ContributedAt, "Date"),
    (SortKey::ContributorName, "Contributor"),
    (SortKey::Amount, "Amount"),
    (SortKey::Comment, "Comment"),
    (SortKey::CreatedAt, "Added"),
];

#[component]
pub fn ContributionTable() -> impl IntoView {
    let store = use_app_store();

    let rows = Memo::new(move |_| {
        let query = store.query().get();
        let contributors = store.contributors().read();
        store.contributions().with(|contributions| {
            query
                .apply(contributions, &contributors)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let header = move |key: SortKey, label: &'static str| {
        let indicator = move || match store.query().read().direction_for(key) {
            Some(SortDirection::Ascending) => " ▲",
            Some(SortDirection::Descending) => " ▼",
            None => "",
        };
        view! {
            <th class="sortable" on:click=move |_| store.query().write().toggle_sort(key)>
                {label} {indicator}
            </th>
        }
    };

    view! {
        <section class="contribution-table">
            <div class="table-controls">
                <input
                    type="search"
                    placeholder="Search contributions..."
                    prop:value=move || store.query().read().search.clone()
                    on:input=move |ev| store.query().write().search = event_target_value(&ev)
                />
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    store.query().write().contributor_id = (!value.is_empty()).then_some(value);
                }>
                    <option value="">"All contributors"</option>
                    <For
                        each=move || store.contributors().get()
                        key=|c| c.id.clone()
                        children=move |c| view! { <option value=c.id.clone()>{c.name.clone()}</option> }
                    />
                </select>
            </div>

            <table>
                <thead>
                    <tr>
                        {COLUMNS.iter().map(|(key, label)| header(*key, *label)).collect_view()}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        rows.get()
                            .into_iter()
                            .map(|c| view! { <ContributionRow contribution=c /> })
                            .collect_view()
                    }}
                </tbody>
            </table>
            <Show when=move || rows.with(|r| r.is_empty())>
                <p class="empty">"No contributions found."</p>
            </Show>
        </section>
    }
}

#[component]
fn ContributionRow(contribution: Contribution) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let contributor_name = store
        .contributors()
        .read_untracked()
        .iter()
        .find(|p| p.id == contribution.contributor_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_CONTRIBUTOR.to_string());
    let row_class = if contribution.has_error() {
        "row-error"
    } else if contribution.is_optimistic() {
        "row-pending"
    } else {
        ""
    };
    let badge = contribution.state.label();
    let busy = contribution.is_optimistic();
    let id = contribution.id.clone();
    let edit_id = id.clone();
    let created = contribution
        .created_at
        .map(|t| t.format(DATE_FORMAT).to_string())
        .unwrap_or_default();

    let request_delete = move |_| match ctx.services().tracker.contributions.request_delete(&id) {
        Ok(request) => store.pending_delete().set(Some(request)),
        Err(e) => ctx.notify_error(&e),
    };

    view! {
        <tr class=row_class title=badge.unwrap_or_default()>
            <td>{contribution.contributed_at.format(DATE_FORMAT).to_string()}</td>
            <td>{contributor_name}</td>
            <td class="amount">{format_usd(contribution.amount_usd)}</td>
            <td>{contribution.comment.clone().unwrap_or_default()}</td>
            <td>{created}</td>
            <td class="row-actions">
                {badge.map(|text| view! { <span class="badge">{text}</span> })}
                <button
                    class="edit-btn"
                    disabled=busy
                    on:click=move |_| store.editor().set(Some(EditorTarget::Existing(edit_id.clone())))
                >
                    "Edit"
                </button>
                <button class="delete-btn" disabled=busy on:click=request_delete>
                    "Delete"
                </button>
            </td>
        </tr>
    }
}
