//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The lists are
//! mirrors of the tracker's state, written only by its subscribers.

use capital_core::config::ServiceStatus;
use capital_core::domain::{Contribution, Contributor};
use capital_core::manager::DeleteRequest;
use capital_core::table::TableQuery;
use leptos::prelude::*;
use reactive_stores::Store;

/// What the contribution form is editing
#[derive(Debug, Clone, PartialEq)]
pub enum EditorTarget {
    New,
    Existing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Distinguishes repeated identical messages for auto-dismiss
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Contributions as the tracker currently shows them, including
    /// in-flight and errored records
    pub contributions: Vec<Contribution>,
    /// Contributors sorted by name
    pub contributors: Vec<Contributor>,
    /// Table search, filter and sort
    pub query: TableQuery,
    /// Delete waiting for confirmation
    pub pending_delete: Option<DeleteRequest>,
    /// Open contribution form, if any
    pub editor: Option<EditorTarget>,
    pub notice: Option<Notice>,
    pub supabase_status: Option<ServiceStatus>,
    pub gemini_status: Option<ServiceStatus>,
    pub loading: bool,
    pub settings_open: bool,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_notify(store: &AppStore, kind: NoticeKind, message: impl Into<String>) {
    let id = store.notice().with_untracked(|n| n.as_ref().map_or(0, |n| n.id + 1));
    store.notice().set(Some(Notice {
        id,
        kind,
        message: message.into(),
    }));
}

pub fn store_dismiss_notice(store: &AppStore, id: u64) {
    if store.notice().with_untracked(|n| n.as_ref().is_some_and(|n| n.id == id)) {
        store.notice().set(None);
    }
}
