//! The remote student store seam.
//!
//! `ApiClient` is the production implementation; tests substitute an
//! in-memory store to observe which calls a flow makes.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::StudentRecord;

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Fetch the full collection, in whatever order the store returns it.
    async fn list(&self) -> Result<Vec<StudentRecord>>;

    /// Persist a new record. The store assigns the id.
    async fn create(&self, candidate: &StudentRecord) -> Result<()>;

    /// Replace the record keyed by `record.id`.
    async fn update(&self, record: &StudentRecord) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;
}
