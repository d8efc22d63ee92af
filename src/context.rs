//! Application Context
//!
//! Shared services provided via Leptos Context API.

use std::rc::Rc;

use capital_core::config::BackendConfig;
use capital_core::manager::{ListenerId, ManagerError};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::backend::Services;
use crate::store::{store_notify, AppStateStoreFields, AppStore, NoticeKind};

/// Live services plus the store listeners registered on them
#[derive(Clone)]
struct Connection {
    services: Rc<Services>,
    contributions: ListenerId,
    contributors: ListenerId,
}

impl Connection {
    /// Stop mirroring this connection's managers into the store
    fn detach(&self) {
        self.services.tracker.contributions.unsubscribe(self.contributions);
        self.services.tracker.contributors.unsubscribe(self.contributors);
    }
}

/// Services and store handle, copied into every component that needs them
#[derive(Clone, Copy)]
pub struct AppContext {
    connection: StoredValue<Connection, LocalStorage>,
    pub store: AppStore,
}

impl AppContext {
    pub fn new(config: &BackendConfig, store: AppStore) -> Self {
        let connection = wire(Rc::new(Services::connect(config)), store);
        Self {
            connection: StoredValue::new_local(connection),
            store,
        }
    }

    /// Current services; replaced when settings change
    pub fn services(&self) -> Rc<Services> {
        self.connection.with_value(|c| c.services.clone())
    }

    /// Rebuild the clients from new credentials and reload everything.
    /// Writes still in flight on the old clients settle without touching
    /// the store.
    pub fn reconnect(&self, config: &BackendConfig) {
        self.connection.with_value(Connection::detach);
        let connection = wire(Rc::new(Services::connect(config)), self.store);
        self.connection.set_value(connection);
        self.store.pending_delete().set(None);
        self.store.editor().set(None);
        self.load();
    }

    /// Fetch contributors and contributions from the remote store
    pub fn load(&self) {
        let services = self.services();
        let store = self.store;
        if !services.is_online() {
            log::warn!("Supabase client not available, skipping data fetch");
            services.tracker.reset();
            return;
        }
        spawn_local(async move {
            store.loading().set(true);
            if let Err(e) = services.tracker.load().await {
                store_notify(&store, NoticeKind::Error, e.to_string());
            }
            store.loading().set(false);
        });
    }

    pub fn notify_error(&self, error: &ManagerError) {
        store_notify(&self.store, NoticeKind::Error, error.to_string());
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        store_notify(&self.store, NoticeKind::Success, message);
    }
}

/// Mirror tracker state and service status into the store
fn wire(services: Rc<Services>, store: AppStore) -> Connection {
    let contributions = services
        .tracker
        .contributions
        .subscribe(move |list| store.contributions().set(list.to_vec()));
    let contributors = services
        .tracker
        .contributors
        .subscribe(move |list| store.contributors().set(list.to_vec()));
    store.contributions().set(services.tracker.contributions.contributions());
    store.contributors().set(services.tracker.contributors.contributors());
    store.supabase_status().set(Some(services.supabase_status.clone()));
    store.gemini_status().set(Some(services.gemini_status.clone()));
    Connection {
        services,
        contributions,
        contributors,
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
