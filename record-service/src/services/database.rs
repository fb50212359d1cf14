use crate::models::{Record, RecordChanges};
use crate::services::store::RecordStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoRecordStore {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoRecordStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self {
            client,
            db,
            collection: collection.to_string(),
        })
    }

    /// Non-unique index on `id`; duplicate ids are tolerated.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for record-service");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .name("record_id_lookup".to_string())
                    .build(),
            )
            .build();

        self.records()
            .create_index(id_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create id index on {} collection: {}",
                    self.collection,
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on {}.id", self.collection);

        Ok(())
    }

    pub fn records(&self) -> Collection<Record> {
        self.db.collection(&self.collection)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Close the driver's connection pools.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn list_all(&self) -> Result<Vec<Record>, AppError> {
        let cursor = self.records().find(None, None).await?;
        let records: Vec<Record> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn create(&self, mut record: Record) -> Result<Record, AppError> {
        let result = self.records().insert_one(&record, None).await?;
        record.object_id = result.inserted_id.as_object_id();
        Ok(record)
    }

    async fn update(&self, id: i64, changes: RecordChanges) -> Result<Option<Record>, AppError> {
        let filter = doc! { "id": id };

        // `$set` with an empty document is rejected by the server.
        if changes.is_empty() {
            return Ok(self.records().find_one(filter, None).await?);
        }

        let update = doc! { "$set": changes.to_set_document()? };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .records()
            .find_one_and_update(filter, update, options)
            .await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = self.records().delete_one(doc! { "id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
