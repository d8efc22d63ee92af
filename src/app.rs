//! Capital Tracker App
//!
//! Dashboard layout: summary cards and chart on top, the contribution table
//! below, with the form, delete dialog and settings as overlays.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{
    ConfirmDialog, ContributionChart, ContributionForm, ContributionTable, NoticeBanner,
    SettingsPanel, SummaryCards,
};
use crate::config::load_backend_config;
use crate::context::AppContext;
use crate::store::{AppState, AppStateStoreFields, EditorTarget};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);

    let ctx = AppContext::new(&load_backend_config(), store);
    provide_context(ctx);

    // Initial load
    ctx.load();

    let status_warning = move || {
        store
            .supabase_status()
            .get()
            .filter(|s| !s.is_success())
            .map(|s| view! { <div class="status-warning">{s.message}</div> })
    };

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Capital Contribution Tracker"</h1>
                <div class="header-actions">
                    <button
                        class="primary-btn"
                        on:click=move |_| store.editor().set(Some(EditorTarget::New))
                    >
                        "Add Contribution"
                    </button>
                    <button class="secondary-btn" on:click=move |_| store.settings_open().set(true)>
                        "Settings"
                    </button>
                </div>
            </header>

            <NoticeBanner />
            {status_warning}

            <Show when=move || store.loading().get()>
                <p class="loading">"Loading data..."</p>
            </Show>

            <main class="main-content">
                <section class="overview">
                    <SummaryCards />
                    <ContributionChart />
                </section>
                <ContributionTable />
            </main>

            <ContributionForm />
            <ConfirmDialog />
            <SettingsPanel />
        </div>
    }
}
