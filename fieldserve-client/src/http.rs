//! The REST data source behind both controllers.
//!
//! One [`ApiClient`] is shared process-wide. The bearer token is asked of
//! the [`TokenProvider`] at dispatch time for every request, never captured
//! at construction, so a login/logout is picked up by the next call.

use crate::paged::{PageQuery, PageSource};
use crate::schedule::TaskSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use fieldserve_core::{
    dates, ApiError, ApiResult, Client, ClientsEnvelope, Page, Product, ProductsEnvelope, Task,
    TaskActionEnvelope, TaskEnvelope, TaskTimestamps, TasksEnvelope,
};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Supplies the current bearer token. `None` means the request goes out
/// unauthenticated and the server answers with 401.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A token fixed for the process lifetime.
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A token slot the auth collaborator swaps at login/logout.
#[derive(Default)]
pub struct SharedToken(RwLock<Option<String>>);

impl SharedToken {
    pub fn set(&self, token: Option<String>) {
        if let Ok(mut slot) = self.0.write() {
            *slot = token;
        }
    }
}

impl TokenProvider for SharedToken {
    fn token(&self) -> Option<String> {
        self.0.read().ok().and_then(|slot| slot.clone())
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenProvider>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub async fn list_clients(&self, page: u32, search: &str, sort: &str) -> ApiResult<Page<Client>> {
        let request = self.http.get(self.url("/clients")).query(&[
            ("page", page.to_string()),
            ("search", search.to_string()),
            ("sort", sort.to_string()),
        ]);
        let envelope: ClientsEnvelope = self.execute(request).await?;
        Ok(envelope.clients)
    }

    pub async fn list_products(&self, page: u32, name: &str) -> ApiResult<Page<Product>> {
        let request = self
            .http
            .get(self.url("/catalog/products"))
            .query(&[("page", page.to_string()), ("name", name.to_string())]);
        let envelope: ProductsEnvelope = self.execute(request).await?;
        Ok(envelope.into_page())
    }

    pub async fn fetch_tasks(&self, technician_id: i64, date: NaiveDate) -> ApiResult<Vec<Task>> {
        let request = self.http.get(self.url("/tasks")).query(&[
            ("technician_id", technician_id.to_string()),
            ("date", dates::date_key(date)),
        ]);
        let envelope: TasksEnvelope = self.execute(request).await?;
        if !envelope.success {
            return Err(ApiError::Validation {
                status: 200,
                message: envelope.message,
            });
        }
        Ok(envelope.tasks)
    }

    pub async fn fetch_task(&self, task_id: i64) -> ApiResult<Task> {
        let request = self.http.get(self.url(&format!("/tasks/{}", task_id)));
        let envelope: TaskEnvelope = self.execute(request).await?;
        if !envelope.success {
            return Err(ApiError::Validation {
                status: 200,
                message: envelope.message,
            });
        }
        envelope
            .task
            .ok_or_else(|| ApiError::DataShape("task detail response without a task".to_string()))
    }

    pub async fn transition_task(
        &self,
        task_id: i64,
        action: &str,
    ) -> ApiResult<TaskTimestamps> {
        let request = self
            .http
            .put(self.url(&format!("/tasks/{}/{}", task_id, action)));
        let envelope: TaskActionEnvelope = self.execute(request).await?;
        if !envelope.success {
            return Err(ApiError::Validation {
                status: 200,
                message: envelope.message,
            });
        }
        Ok(envelope.task.unwrap_or_default())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ApiResult<T> {
        // Token attached here, per request, not at client construction.
        let request = match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request transport failure");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
                .and_then(|body| {
                    body.get("message")
                        .and_then(|m| m.as_str())
                        .map(String::from)
                });
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::DataShape(e.to_string()))
    }
}

/// `GET /clients` as a page source for [`crate::paged::PagedList`].
pub struct ClientPages(pub Arc<ApiClient>);

#[async_trait]
impl PageSource<Client> for ClientPages {
    async fn fetch_page(&self, page: u32, query: &PageQuery) -> ApiResult<Page<Client>> {
        self.0.list_clients(page, &query.search, &query.sort).await
    }
}

/// `GET /catalog/products` as a page source. The catalog endpoint filters
/// by `name` and has no sort parameter.
pub struct ProductPages(pub Arc<ApiClient>);

#[async_trait]
impl PageSource<Product> for ProductPages {
    async fn fetch_page(&self, page: u32, query: &PageQuery) -> ApiResult<Page<Product>> {
        self.0.list_products(page, &query.search).await
    }
}

#[async_trait]
impl TaskSource for ApiClient {
    async fn tasks_for_day(&self, technician_id: i64, date: NaiveDate) -> ApiResult<Vec<Task>> {
        self.fetch_tasks(technician_id, date).await
    }

    async fn task_detail(&self, task_id: i64) -> ApiResult<Task> {
        self.fetch_task(task_id).await
    }

    async fn start_task(&self, task_id: i64) -> ApiResult<TaskTimestamps> {
        self.transition_task(task_id, "start").await
    }

    async fn finish_task(&self, task_id: i64) -> ApiResult<TaskTimestamps> {
        self.transition_task(task_id, "finish").await
    }
}
