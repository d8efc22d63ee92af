//! Supabase Repository Implementation
//!
//! PostgREST-over-HTTP implementation of the remote collection traits.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::error::{RemoteError, RemoteResult};
use super::traits::{DeletableCollection, RemoteCollection};
use crate::config::{BackendConfig, ConfigError};
use crate::domain::{Contribution, Contributor, Entity};

/// HTTP client for one Supabase project
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SupabaseClient {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(url.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {}", base_url.scheme()),
            });
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(anon_key.trim())
            .map_err(|e| ConfigError::Client(format!("invalid anon key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", anon_key.trim()))
            .map_err(|e| ConfigError::Client(format!("invalid anon key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        log::info!("Supabase client initialized for {}", base_url);
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigError> {
        let (url, anon_key) = config
            .supabase_credentials()
            .ok_or(ConfigError::MissingCredentials)?;
        Self::new(url, anon_key)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RemoteResult<Vec<T>> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| RemoteError::message(format!("Unexpected response from server: {e}")))
    }

    async fn write_one<T: Entity>(&self, builder: RequestBuilder, verb: &str) -> RemoteResult<T> {
        let rows: Vec<T> = self
            .fetch_rows(builder.header("Prefer", "return=representation"))
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            RemoteError::message(format!("Failed to {verb} {}, no data returned.", T::NOUN))
        })
    }

    async fn list_entity<T: Entity>(&self) -> RemoteResult<Vec<T>> {
        let url = table_url::<T>(&self.base_url, None, true);
        log::debug!("GET {}", url);
        self.fetch_rows(self.request(Method::GET, url)).await
    }

    async fn create_entity<T: Entity>(&self, draft: &T::Draft) -> RemoteResult<T> {
        let url = table_url::<T>(&self.base_url, None, false);
        log::debug!("POST {}", url);
        self.write_one(self.request(Method::POST, url).json(draft), "add").await
    }

    async fn update_entity<T: Entity>(&self, id: &str, patch: &T::Patch) -> RemoteResult<T> {
        let url = table_url::<T>(&self.base_url, Some(id), false);
        log::debug!("PATCH {}", url);
        self.write_one(self.request(Method::PATCH, url).json(patch), "update").await
    }
}

/// `{base}/rest/v1/{table}` with the column selection and an optional
/// `id=eq.{id}` filter
pub(crate) fn table_url<T: Entity>(base: &Url, id: Option<&str>, ordered: bool) -> Url {
    let mut url = base.clone();
    let path = format!("{}/rest/v1/{}", base.path().trim_end_matches('/'), T::TABLE);
    url.set_path(&path);
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.append_pair("select", T::COLUMNS);
        if let Some(id) = id {
            query.append_pair("id", &format!("eq.{id}"));
        }
        if let (true, Some(order)) = (ordered, T::ORDER) {
            query.append_pair("order", order);
        }
    }
    url
}

/// Error body of a failed request; the HTTP status stands in for a missing code
pub(crate) fn decode_error(status: u16, body: &str) -> RemoteError {
    let mut error = serde_json::from_str::<RemoteError>(body).unwrap_or_else(|_| {
        let text = body.trim();
        if text.is_empty() {
            RemoteError::default()
        } else {
            RemoteError::message(text)
        }
    });
    if error.code.is_none() {
        error.code = Some(status.to_string());
    }
    error
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    RemoteError::message(e.to_string())
}

#[async_trait(?Send)]
impl RemoteCollection<Contribution> for SupabaseClient {
    async fn list(&self) -> RemoteResult<Vec<Contribution>> {
        self.list_entity().await
    }

    async fn create(&self, draft: &<Contribution as Entity>::Draft) -> RemoteResult<Contribution> {
        self.create_entity::<Contribution>(draft).await
    }

    async fn update(&self, id: &str, patch: &<Contribution as Entity>::Patch) -> RemoteResult<Contribution> {
        self.update_entity::<Contribution>(id, patch).await
    }
}

#[async_trait(?Send)]
impl DeletableCollection<Contribution> for SupabaseClient {
    async fn delete(&self, id: &str) -> RemoteResult<()> {
        let url = table_url::<Contribution>(&self.base_url, Some(id), false);
        log::debug!("DELETE {}", url);
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(decode_error(status.as_u16(), &body))
    }
}

#[async_trait(?Send)]
impl RemoteCollection<Contributor> for SupabaseClient {
    async fn list(&self) -> RemoteResult<Vec<Contributor>> {
        self.list_entity().await
    }

    async fn create(&self, draft: &<Contributor as Entity>::Draft) -> RemoteResult<Contributor> {
        self.create_entity::<Contributor>(draft).await
    }

    async fn update(&self, id: &str, patch: &<Contributor as Entity>::Patch) -> RemoteResult<Contributor> {
        self.update_entity::<Contributor>(id, patch).await
    }
}
