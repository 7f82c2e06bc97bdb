//! API client for the remote student store.
//!
//! The store is a plain JSON resource at a configured base URL:
//! `GET {base}`, `POST {base}`, `PUT {base}/{id}`, `DELETE {base}/{id}`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::StudentRecord;
use crate::store::StudentStore;

use super::ApiError;

/// API client for the student store.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Create a client with no request timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client, optionally bounding every request by `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            anyhow::bail!("Student store base URL is empty");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn member_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Fetch every student in the store, in the store's order.
    pub async fn list_students(&self) -> Result<Vec<StudentRecord>> {
        let response = self
            .client
            .get(&*self.base_url)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", self.base_url))?;

        let response = Self::check_response(response).await?;

        let text = response
            .text()
            .await
            .context("Failed to read student list body")?;
        let students: Vec<StudentRecord> =
            serde_json::from_str(&text).context("Failed to parse student list")?;

        debug!(count = students.len(), "Student list received");
        Ok(students)
    }

    /// Create a student. Any `id` on the candidate is not sent.
    pub async fn create_student(&self, candidate: &StudentRecord) -> Result<()> {
        let body = candidate.without_id();
        let response = self
            .client
            .post(&*self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", self.base_url))?;

        Self::check_response(response).await?;
        debug!(name = %candidate.full_name, "Student created");
        Ok(())
    }

    /// Replace the stored student keyed by `record.id`.
    pub async fn update_student(&self, record: &StudentRecord) -> Result<()> {
        let id = record.id.ok_or(ApiError::MissingId)?;
        let url = self.member_url(id);

        let response = self
            .client
            .put(&url)
            .json(record)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        Self::check_response(response).await?;
        debug!(id, "Student updated");
        Ok(())
    }

    /// Delete the student with `id`.
    pub async fn delete_student(&self, id: i64) -> Result<()> {
        let url = self.member_url(id);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        Self::check_response(response).await?;
        debug!(id, "Student deleted");
        Ok(())
    }
}

#[async_trait]
impl StudentStore for ApiClient {
    async fn list(&self) -> Result<Vec<StudentRecord>> {
        self.list_students().await
    }

    async fn create(&self, candidate: &StudentRecord) -> Result<()> {
        self.create_student(candidate).await
    }

    async fn update(&self, record: &StudentRecord) -> Result<()> {
        self.update_student(record).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.delete_student(id).await
    }
}
