//! Contribution Chart Component
//!
//! Donut chart of each contributor's share, drawn as stroked SVG circles.

use capital_core::format::format_percent;
use capital_core::stats;
use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

const RADIUS: f64 = 15.915_494_309_189_533; // circumference of 100
const CIRCUMFERENCE: f64 = 100.0;

#[component]
pub fn ContributionChart() -> impl IntoView {
    let store = use_app_store();
    let slices = Memo::new(move |_| {
        let summaries = store
            .contributions()
            .with(|contributions| stats::summarize(&store.contributors().read(), contributions));
        stats::chart_slices(&summaries)
    });

    let arcs = move || {
        let mut offset = 0.0;
        slices
            .get()
            .into_iter()
            .map(|slice| {
                let length = slice.fraction * CIRCUMFERENCE;
                let dash = format!("{length} {}", CIRCUMFERENCE - length);
                // Start at 12 o'clock and run clockwise
                let dash_offset = format!("{}", 25.0 - offset);
                offset += length;
                let tooltip = store.contributions().with(|all| stats::chart_tooltip(&slice, all));
                view! {
                    <circle
                        cx="21"
                        cy="21"
                        r=RADIUS
                        fill="transparent"
                        stroke=slice.color
                        stroke-width="5"
                        stroke-dasharray=dash
                        stroke-dashoffset=dash_offset
                    >
                        <title>{tooltip}</title>
                    </circle>
                }
            })
            .collect_view()
    };

    view! {
        <div class="chart">
            <h2>"Contribution Breakdown"</h2>
            <Show
                when=move || !slices.get().is_empty()
                fallback=|| view! { <p class="empty">"No contributions yet."</p> }
            >
                <svg class="donut" viewBox="0 0 42 42" width="200" height="200">
                    {arcs}
                </svg>
                <ul class="legend">
                    {move || {
                        slices
                            .get()
                            .into_iter()
                            .map(|slice| {
                                let tooltip = store
                                    .contributions()
                                    .with(|all| stats::chart_tooltip(&slice, all));
                                view! {
                                    <li title=tooltip>
                                        <span class="swatch" style:background-color=slice.color></span>
                                        {slice.name} " " {format_percent(slice.fraction * 100.0, 1)}
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}
