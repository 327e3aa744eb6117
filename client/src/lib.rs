use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Url;
use reqwest::blocking::Client as ReqwestClient;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;

use common::Report;

mod cache;
mod outbox;
mod reports;
mod session;
mod store;

pub use outbox::PendingWrite;
pub use reports::{ReportsApi, Snapshot};
pub use session::{AuthError, SessionManager};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT_VALUE: &str = concat!("LaporClient/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote store returned HTTP {0}")]
    RemoteStatus(u16),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub struct SyncClientBuilder {
    endpoint: String,
    timeout: Duration,
}

impl SyncClientBuilder {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: TIMEOUT,
        }
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self, store: Arc<dyn KeyValueStore>) -> Result<SyncClient, SyncError> {
        SyncClient::new(&self.endpoint, self.timeout, store)
    }
}

/// Client for the spreadsheet-backed remote report store. Reads degrade to
/// the local cache, writes are fire-and-forget with a pending outbox; see
/// [`ReportsApi`] for the contract.
pub struct SyncClient {
    endpoint: Url,
    http: ReqwestClient,
    store: Arc<dyn KeyValueStore>,
}

impl SyncClient {
    fn new(
        endpoint: &str,
        timeout: Duration,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SyncError> {
        let endpoint = Url::parse(endpoint)?;
        let client = ReqwestClient::builder()
            .default_headers(Self::set_headers())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint,
            http: client,
            store,
        })
    }

    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> SyncClientBuilder {
        SyncClientBuilder::new(endpoint)
    }

    #[must_use]
    pub const fn info(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub const fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    pub(crate) fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    fn set_headers() -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Remote read with a cache-busting query so intermediaries never serve
    /// a stale sheet.
    pub(crate) fn get_rows(&self) -> Result<Vec<Report>, SyncError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("t", &cache_buster().to_string());

        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus(status.as_u16()));
        }
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fire-and-forget POST. Transport errors surface so the caller can fall
    /// back to the cache; the response itself is never interpreted because
    /// the remote endpoint cannot return a readable confirmation.
    pub(crate) fn dispatch<B: Serialize + ?Sized>(&self, body: &B) -> Result<(), reqwest::Error> {
        self.http
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .map(drop)
    }
}

fn cache_buster() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}
