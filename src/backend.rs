//! Backend Adapter
//!
//! The remote store the UI talks to: Supabase when credentials are present,
//! otherwise an empty in-memory collection so the page still works offline.

use std::rc::Rc;

use async_trait::async_trait;
use capital_core::config::{BackendConfig, ServiceStatus};
use capital_core::domain::{
    Contribution, ContributionPatch, Contributor, ContributorPatch, NewContribution, NewContributor,
};
use capital_core::repository::{
    DeletableCollection, MemoryCollection, RemoteCollection, RemoteResult, SupabaseClient,
};
use capital_core::suggest::{suggester_from_config, CommentSuggester};
use capital_core::Tracker;

pub enum Backend {
    Supabase(SupabaseClient),
    Offline(MemoryCollection),
}

#[async_trait(?Send)]
impl RemoteCollection<Contribution> for Backend {
    async fn list(&self) -> RemoteResult<Vec<Contribution>> {
        match self {
            Backend::Supabase(c) => RemoteCollection::<Contribution>::list(c).await,
            Backend::Offline(m) => RemoteCollection::<Contribution>::list(m).await,
        }
    }

    async fn create(&self, draft: &NewContribution) -> RemoteResult<Contribution> {
        match self {
            Backend::Supabase(c) => RemoteCollection::<Contribution>::create(c, draft).await,
            Backend::Offline(m) => RemoteCollection::<Contribution>::create(m, draft).await,
        }
    }

    async fn update(&self, id: &str, patch: &ContributionPatch) -> RemoteResult<Contribution> {
        match self {
            Backend::Supabase(c) => RemoteCollection::<Contribution>::update(c, id, patch).await,
            Backend::Offline(m) => RemoteCollection::<Contribution>::update(m, id, patch).await,
        }
    }
}

#[async_trait(?Send)]
impl DeletableCollection<Contribution> for Backend {
    async fn delete(&self, id: &str) -> RemoteResult<()> {
        match self {
            Backend::Supabase(c) => DeletableCollection::<Contribution>::delete(c, id).await,
            Backend::Offline(m) => DeletableCollection::<Contribution>::delete(m, id).await,
        }
    }
}

#[async_trait(?Send)]
impl RemoteCollection<Contributor> for Backend {
    async fn list(&self) -> RemoteResult<Vec<Contributor>> {
        match self {
            Backend::Supabase(c) => RemoteCollection::<Contributor>::list(c).await,
            Backend::Offline(m) => RemoteCollection::<Contributor>::list(m).await,
        }
    }

    async fn create(&self, draft: &NewContributor) -> RemoteResult<Contributor> {
        match self {
            Backend::Supabase(c) => RemoteCollection::<Contributor>::create(c, draft).await,
            Backend::Offline(m) => RemoteCollection::<Contributor>::create(m, draft).await,
        }
    }

    async fn update(&self, id: &str, patch: &ContributorPatch) -> RemoteResult<Contributor> {
        match self {
            Backend::Supabase(c) => RemoteCollection::<Contributor>::update(c, id, patch).await,
            Backend::Offline(m) => RemoteCollection::<Contributor>::update(m, id, patch).await,
        }
    }
}

/// Everything built from one configuration
pub struct Services {
    pub tracker: Rc<Tracker<Backend>>,
    pub suggester: Rc<dyn CommentSuggester>,
    pub supabase_status: ServiceStatus,
    pub gemini_status: ServiceStatus,
}

impl Services {
    pub fn connect(config: &BackendConfig) -> Self {
        let attempted = config.supabase_url.is_some() || config.supabase_anon_key.is_some();
        let has_credentials = config.supabase_credentials().is_some();

        let backend = match SupabaseClient::from_config(config) {
            Ok(client) => Some(Backend::Supabase(client)),
            Err(e) => {
                if has_credentials {
                    log::error!("Failed to initialize Supabase client: {}", e);
                } else {
                    log::warn!("Supabase not configured: {}", e);
                }
                None
            }
        };
        let supabase_status = ServiceStatus::supabase(attempted, has_credentials, backend.is_some());
        let backend = backend.unwrap_or_else(|| Backend::Offline(MemoryCollection::new()));

        let suggester: Rc<dyn CommentSuggester> = Rc::from(suggester_from_config(config));
        let gemini_status = suggester.status();

        Self {
            tracker: Rc::new(Tracker::new(backend)),
            suggester,
            supabase_status,
            gemini_status,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self.tracker.remote(), Backend::Supabase(_))
    }
}
