//! Task API implementation using reqwest.
//!
//! This adapter implements the `TaskApi` port against the task backend's
//! REST interface. The `reqwest::Client` is built (or injected) explicitly
//! and owned by the adapter; there is no process-wide client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tasklist_application::ports::{ApiError, TaskApi};
use tasklist_domain::{IdToken, Task, TaskTitle};
use url::Url;

use crate::error::AdapterError;

/// Default transport timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Path of the task collection, relative to the base URL.
const TASKS_PATH: &str = "apikey/tasks";

#[derive(Serialize)]
struct NewTaskBody<'a> {
    title: &'a TaskTitle,
}

#[derive(Serialize)]
struct CompletedBody {
    completed: bool,
}

/// Task backend client using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTaskApi {
    client: Client,
    tasks_url: Url,
    timeout_ms: u64,
}

impl ReqwestTaskApi {
    /// Creates a client for the backend at `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be created.
    pub fn new(base_url: &str) -> Result<Self, AdapterError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_MS)
    }

    /// Creates a client with a custom transport timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be created.
    pub fn with_timeout(base_url: &str, timeout_ms: u64) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .user_agent(concat!("tasklist/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AdapterError::Client(e.to_string()))?;

        Self::with_client(client, base_url, timeout_ms)
    }

    /// Creates an adapter around an existing reqwest client.
    ///
    /// `timeout_ms` is only used to describe timeouts in errors; the client's
    /// own configuration decides when a request times out.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_client(
        client: Client,
        base_url: &str,
        timeout_ms: u64,
    ) -> Result<Self, AdapterError> {
        let mut base =
            Url::parse(base_url).map_err(|e| AdapterError::InvalidUrl(format!("{e}: {base_url}")))?;
        if base.cannot_be_a_base() {
            return Err(AdapterError::InvalidUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let tasks_url = base
            .join(TASKS_PATH)
            .map_err(|e| AdapterError::InvalidUrl(format!("{e}: {base_url}")))?;

        Ok(Self {
            client,
            tasks_url,
            timeout_ms,
        })
    }

    /// URL of the task collection.
    #[must_use]
    pub const fn tasks_url(&self) -> &Url {
        &self.tasks_url
    }

    /// URL of a single task; the id is encoded as one path segment.
    fn task_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = self.tasks_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Connection(format!("cannot address task {id}")))?
            .push(id);
        Ok(url)
    }

    /// Maps reqwest errors to the port's `ApiError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> ApiError {
        if error.is_timeout() {
            return ApiError::Timeout { timeout_ms };
        }
        if error.is_decode() {
            return ApiError::Decode(error.to_string());
        }
        ApiError::Connection(error.to_string())
    }

    /// Sends an authenticated request and rejects non-success statuses.
    async fn send(&self, builder: RequestBuilder, token: &IdToken) -> Result<Response, ApiError> {
        let response = builder
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "task API response");
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Reads and decodes a JSON body.
    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TaskApi for ReqwestTaskApi {
    async fn list(&self, token: &IdToken) -> Result<Vec<Task>, ApiError> {
        let request = self.client.get(self.tasks_url.clone());
        let response = self.send(request, token).await?;
        self.decode(response).await
    }

    async fn create(&self, token: &IdToken, title: &TaskTitle) -> Result<Task, ApiError> {
        let request = self
            .client
            .post(self.tasks_url.clone())
            .json(&NewTaskBody { title });
        let response = self.send(request, token).await?;
        self.decode(response).await
    }

    async fn update_completed(
        &self,
        token: &IdToken,
        id: &str,
        completed: bool,
    ) -> Result<Task, ApiError> {
        let request = self
            .client
            .patch(self.task_url(id)?)
            .json(&CompletedBody { completed });
        let response = self.send(request, token).await?;
        self.decode(response).await
    }

    async fn delete_completed(&self, token: &IdToken) -> Result<(), ApiError> {
        let request = self.client.delete(self.tasks_url.clone());
        // Any body (204 empty, or a summary on 200) is ignored.
        self.send(request, token).await.map(|_| ())
    }
}
