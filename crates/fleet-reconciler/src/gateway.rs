// The remote call gateway: authenticated HTTP verbs against the API base
// URL, with non-2xx responses normalized into typed failures.

use crate::credential_provider::CredentialProvider;
use crate::models::Paged;
use async_trait::async_trait;
use chrono::Utc;
use fleet_common::constants::{self, api};
use fleet_common::{Credential, FleetError, Result, Tracing};
use fleet_sdk::{TraceWriter, UrlUtil};
use parking_lot::RwLock;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A successful (or tolerated) response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub path: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| FleetError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

/// One authenticated call against the remote API.
///
/// Reconcilers only talk to this trait, so they can be driven by a
/// recording fake in tests.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse>;
}

/// `GET path`, decoded into `T`.
pub async fn get_json<T: DeserializeOwned>(api: &dyn RemoteApi, path: &str) -> Result<T> {
    api.call(Method::GET, path, None).await?.json()
}

/// `method path` with a JSON body, decoded into `T`.
pub async fn send_json<B, T>(api: &dyn RemoteApi, method: Method, path: &str, body: &B) -> Result<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = encode_body(path, body)?;
    api.call(method, path, Some(body)).await?.json()
}

/// `method path` with an optional JSON body; the response body is ignored.
pub async fn send_empty<B>(api: &dyn RemoteApi, method: Method, path: &str, body: Option<&B>) -> Result<()>
where
    B: Serialize + ?Sized,
{
    let body = body.map(|b| encode_body(path, b)).transpose()?;
    api.call(method, path, body).await?;
    Ok(())
}

/// Every item of a paged list endpoint, following pages until the remote
/// total is reached or a page comes back empty.
pub async fn get_all<P>(api: &dyn RemoteApi, path: &str) -> Result<Vec<P::Item>>
where
    P: Paged + DeserializeOwned,
{
    let mut items = Vec::new();
    let mut page = 1u32;
    loop {
        let paged: P = get_json(
            api,
            &format!("{path}?per_page={}&page={page}", constants::PAGE_SIZE),
        )
        .await?;
        let total = paged.total_count();
        let batch = paged.into_items();
        let exhausted = batch.is_empty();
        items.extend(batch);
        if exhausted || items.len() as u64 >= total {
            return Ok(items);
        }
        page += 1;
    }
}

fn encode_body<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| FleetError::Config(format!("failed to encode request body for {path}: {e}")))
}

// ---------------------------------------------------------------------------
// Credential cache
// ---------------------------------------------------------------------------

/// Holds the current credential as an immutable snapshot and replaces it
/// when it is missing or about to expire.
pub struct CredentialCache {
    provider: Arc<dyn CredentialProvider>,
    current: RwLock<Option<Arc<Credential>>>,
    refresh: tokio::sync::Mutex<()>,
}

impl CredentialCache {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            provider,
            current: RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    /// A credential that is valid for at least the refresh skew.
    pub async fn current(&self) -> Result<Arc<Credential>> {
        if let Some(credential) = self.fresh() {
            return Ok(credential);
        }

        // One refresh at a time; late arrivals pick up the winner's snapshot.
        let _guard = self.refresh.lock().await;
        if let Some(credential) = self.fresh() {
            return Ok(credential);
        }

        let credential = Arc::new(self.provider.obtain().await?);
        *self.current.write() = Some(credential.clone());
        Ok(credential)
    }

    fn fresh(&self) -> Option<Arc<Credential>> {
        self.current
            .read()
            .as_ref()
            .filter(|c| !c.expires_within(Utc::now(), constants::CREDENTIAL_REFRESH_SKEW))
            .cloned()
    }
}

// ---------------------------------------------------------------------------
// HTTP gateway
// ---------------------------------------------------------------------------

/// `RemoteApi` over reqwest.
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
    credentials: CredentialCache,
    trace: Tracing,
}

impl ApiGateway {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        provider: Arc<dyn CredentialProvider>,
        trace: Tracing,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: CredentialCache::new(provider),
            trace,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Obtain the first credential eagerly, so bad settings surface before
    /// any reconciliation starts.
    pub async fn authenticate(&self) -> Result<()> {
        let credential = self.credentials.current().await?;
        self.trace.verbose(&format!(
            "Authenticated with {:?} credential",
            credential.origin()
        ));
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for ApiGateway {
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let credential = self.credentials.current().await?;
        let url = UrlUtil::join(&self.base_url, path);

        self.trace.verbose(&format!("{method} {path}"));

        let transport = |source: reqwest::Error| FleetError::Transport {
            method: method.to_string(),
            path: path.to_string(),
            source,
        };

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(credential.value())
            .header(ACCEPT, api::ACCEPT)
            .header(api::VERSION_HEADER, api::VERSION);

        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;

        if status.is_success() || (method == Method::DELETE && status == StatusCode::NOT_FOUND) {
            if !status.is_success() {
                self.trace.verbose(&format!("{method} {path}: already gone"));
            }
            return Ok(ApiResponse {
                status: status.as_u16(),
                path: path.to_string(),
                body: bytes.to_vec(),
            });
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        self.trace
            .warning(&format!("{method} {path} returned {}", status.as_u16()));

        Err(FleetError::Remote {
            method: method.to_string(),
            path: path.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}
