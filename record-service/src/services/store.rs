use crate::models::{Record, RecordChanges};
use async_trait::async_trait;
use service_core::error::AppError;

/// Persistence for records, addressed by their application-assigned `id`.
///
/// `id` is not unique in the store: update and delete act on the first
/// matching record in natural order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every stored record, in the store's natural order.
    async fn list_all(&self) -> Result<Vec<Record>, AppError>;

    /// Persist a new record and return it as stored.
    async fn create(&self, record: Record) -> Result<Record, AppError>;

    /// Apply `changes` to the first record with this `id` and return the
    /// updated record, or `None` when nothing matches. Never inserts.
    async fn update(&self, id: i64, changes: RecordChanges) -> Result<Option<Record>, AppError>;

    /// Remove the first record with this `id`. Returns whether one existed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
