use super::dto::{EntryPayload, RemoteEntryDto, SyncRequest};
use super::error::{RemoteResult, RemoteStoreError};
use crate::application::ports::RemoteEntryApi;
use crate::domain::entities::{Entry, RemoteEntry};
use crate::shared::config::RemoteConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// REST client for the remote entry service (`/entries`, `/sync`).
#[derive(Clone)]
pub struct HttpRemoteEntryClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRemoteEntryClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(AppError::ConfigurationError(
                "Remote base url is empty".to_string(),
            ));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| AppError::ConfigurationError(err.to_string()))?;
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, AppError> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> RemoteResult<T> {
        let response = ensure_success(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| RemoteStoreError::Decode(err.to_string()))
    }

    async fn post_entry(&self, entry: &Entry) -> RemoteResult<RemoteEntryDto> {
        Self::send_json(
            self.request(Method::POST, "/entries")
                .json(&EntryPayload::for_create(entry)),
        )
        .await
    }

    async fn get_entries(&self) -> RemoteResult<Vec<RemoteEntryDto>> {
        Self::send_json(self.request(Method::GET, "/entries")).await
    }

    async fn post_sync(&self, entries: &[Entry]) -> RemoteResult<Vec<Option<RemoteEntryDto>>> {
        let body = SyncRequest {
            entries: entries.iter().map(EntryPayload::for_sync).collect(),
        };
        Self::send_json(self.request(Method::POST, "/sync").json(&body)).await
    }
}

async fn ensure_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteStoreError::Status { status, body })
}

fn decode(dto: RemoteEntryDto, fallback: chrono::DateTime<Utc>) -> Result<RemoteEntry, AppError> {
    dto.into_domain(fallback)
        .map_err(|err| AppError::from(RemoteStoreError::Decode(err)))
}

#[async_trait]
impl RemoteEntryApi for HttpRemoteEntryClient {
    async fn create_entry(&self, entry: &Entry) -> Result<RemoteEntry, AppError> {
        let dto = self.post_entry(entry).await.inspect_err(|err| {
            tracing::warn!(target: "sync::remote", error = %err, "create entry request failed");
        })?;
        let remote = decode(dto, entry.created_at)?;
        tracing::debug!(
            target: "sync::remote",
            remote_id = %remote.remote_id,
            "entry created remotely"
        );
        Ok(remote)
    }

    async fn list_entries(&self) -> Result<Vec<RemoteEntry>, AppError> {
        let dtos = self.get_entries().await.inspect_err(|err| {
            tracing::warn!(target: "sync::remote", error = %err, "list entries request failed");
        })?;
        let now = Utc::now();
        let entries = dtos
            .into_iter()
            .map(|dto| decode(dto, now))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(target: "sync::remote", count = entries.len(), "entries listed");
        Ok(entries)
    }

    async fn batch_sync(&self, entries: &[Entry]) -> Result<Vec<Option<RemoteEntry>>, AppError> {
        let dtos = self.post_sync(entries).await.inspect_err(|err| {
            tracing::warn!(
                target: "sync::remote",
                error = %err,
                batch = entries.len(),
                "batch sync request failed"
            );
        })?;
        let acknowledged = dtos
            .into_iter()
            .zip(entries)
            .map(|(dto, entry)| dto.map(|dto| decode(dto, entry.created_at)).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            target: "sync::remote",
            submitted = entries.len(),
            acknowledged = acknowledged.iter().filter(|slot| slot.is_some()).count(),
            "batch sync completed"
        );
        Ok(acknowledged)
    }
}
