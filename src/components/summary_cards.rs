//! Summary Cards Component
//!
//! One card per contributor: total, share of the grand total and progress
//! toward the 50% target.

use capital_core::format::{format_percent, format_signed_usd, format_usd};
use capital_core::stats::{self, ContributorSummary};
use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn SummaryCards() -> impl IntoView {
    let store = use_app_store();
    let summaries = Memo::new(move |_| {
        store
            .contributions()
            .with(|contributions| stats::summarize(&store.contributors().read(), contributions))
    });
    let grand_total = Memo::new(move |_| store.contributions().with(|c| stats::grand_total(c)));

    view! {
        <div class="summary">
            <p class="grand-total">"Total capital: " {move || format_usd(grand_total.get())}</p>
            <div class="summary-cards">
                // Every card depends on the grand total, so all of them
                // re-render whenever any contribution changes
                {move || {
                    summaries
                        .get()
                        .into_iter()
                        .map(|summary| view! { <SummaryCard summary=summary /> })
                        .collect_view()
                }}
            </div>
        </div>
    }
}

#[component]
fn SummaryCard(summary: ContributorSummary) -> impl IntoView {
    let ContributorSummary { contributor, stats, color } = summary;
    let avatar = match contributor.profile_picture_url.clone() {
        Some(url) => view! { <img class="avatar" src=url alt=contributor.name.clone() /> }.into_any(),
        None => view! {
            <span class="avatar avatar-initials" style:background-color=color>
                {contributor.initials()}
            </span>
        }
        .into_any(),
    };
    let diff_class = if stats.diff_to_target >= 0.0 { "diff positive" } else { "diff negative" };

    view! {
        <div class="summary-card" style:border-top-color=color>
            <div class="card-header">
                {avatar}
                <h3>{contributor.name.clone()}</h3>
            </div>
            <p class="card-total">{format_usd(stats.total)}</p>
            <p class="card-share">{format_percent(stats.percentage_share, 1)} " of total"</p>
            <div class="progress" title="Progress toward 50% target">
                <div
                    class="progress-bar"
                    style:width=format!("{:.0}%", stats.progress_to_target)
                    style:background-color=color
                ></div>
            </div>
            <p class=diff_class>{format_signed_usd(stats.diff_to_target)} " vs 50% target"</p>
            <Show when=move || { stats.amount_to_match_top > 0.0 }>
                <p class="card-match">{format_usd(stats.amount_to_match_top)} " to match the top contributor"</p>
            </Show>
        </div>
    }
}
