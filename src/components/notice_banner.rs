//! Notice Banner Component
//!
//! Shows the latest success or error message and hides it after a while.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::store::{store_dismiss_notice, use_app_store, AppStateStoreFields, NoticeKind};

const SUCCESS_DISMISS_MS: u32 = 3_000;
const ERROR_DISMISS_MS: u32 = 8_000;

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let store = use_app_store();

    Effect::new(move |_| {
        if let Some(notice) = store.notice().get() {
            let delay = match notice.kind {
                NoticeKind::Success => SUCCESS_DISMISS_MS,
                NoticeKind::Error => ERROR_DISMISS_MS,
            };
            spawn_local(async move {
                TimeoutFuture::new(delay).await;
                store_dismiss_notice(&store, notice.id);
            });
        }
    });

    move || {
        store.notice().get().map(|notice| {
            let class = match notice.kind {
                NoticeKind::Success => "notice notice-success",
                NoticeKind::Error => "notice notice-error",
            };
            let id = notice.id;
            view! {
                <div class=class role="alert">
                    <span>{notice.message}</span>
                    <button class="notice-close" on:click=move |_| store_dismiss_notice(&store, id)>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
