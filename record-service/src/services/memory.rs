use crate::models::{Record, RecordChanges};
use crate::services::store::RecordStore;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::RwLock;

/// Process-local record store with the same matching rules as MongoDB.
///
/// Used by the test suite and when the service runs with `STORE_BACKEND=memory`.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(e: impl std::fmt::Display) -> AppError {
        AppError::DatabaseError(anyhow::anyhow!("In-memory store lock poisoned: {}", e))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_all(&self) -> Result<Vec<Record>, AppError> {
        Ok(self.records.read().map_err(Self::poisoned)?.clone())
    }

    async fn create(&self, mut record: Record) -> Result<Record, AppError> {
        record.object_id = Some(ObjectId::new());
        self.records
            .write()
            .map_err(Self::poisoned)?
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, changes: RecordChanges) -> Result<Option<Record>, AppError> {
        let mut records = self.records.write().map_err(Self::poisoned)?;
        Ok(records.iter_mut().find(|r| r.id == id).map(|record| {
            record.apply(changes);
            record.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut records = self.records.write().map_err(Self::poisoned)?;
        match records.iter().position(|r| r.id == id) {
            Some(index) => {
                records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
