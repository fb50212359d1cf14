use crate::dtos::{MessageResponse, RecordInput, RecordResponse};
use crate::middleware::FieldMap;
use crate::services::record_write;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use service_core::error::AppError;

pub async fn list_records(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = state.store.list_all().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch records");
        AppError::InternalError(anyhow::anyhow!("Failed to fetch users"))
    })?;

    tracing::debug!(count = records.len(), "Fetched records");

    let body: Vec<RecordResponse> = records.into_iter().map(RecordResponse::from).collect();
    Ok(Json(body))
}

pub async fn create_record(
    State(state): State<AppState>,
    FieldMap(fields): FieldMap,
) -> Result<impl IntoResponse, AppError> {
    let record = RecordInput::from_fields(fields).into_record(Utc::now().timestamp_millis());
    let id = record.id;

    state.store.create(record).await.map_err(|e| {
        tracing::error!(record_id = id, error = %e, "Failed to insert record");
        record_write("create", "error");
        AppError::InternalError(anyhow::anyhow!("Failed to add user"))
    })?;

    record_write("create", "ok");
    tracing::info!(record_id = id, "Record created");

    Ok(Json(MessageResponse::new("User added successfully")))
}

pub async fn update_record(
    State(state): State<AppState>,
    FieldMap(fields): FieldMap,
) -> Result<impl IntoResponse, AppError> {
    let input = RecordInput::from_fields(fields);

    // Without an id nothing can match.
    let Some(id) = input.id else {
        record_write("update", "not_found");
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    };

    let updated = state
        .store
        .update(id, input.into_changes())
        .await
        .map_err(|e| {
            tracing::error!(record_id = id, error = %e, "Failed to update record");
            record_write("update", "error");
            AppError::InternalError(anyhow::anyhow!("Failed to update user"))
        })?;

    match updated {
        Some(_) => {
            record_write("update", "ok");
            tracing::info!(record_id = id, "Record updated");
            Ok(Json(MessageResponse::new("User updated successfully")))
        }
        None => {
            record_write("update", "not_found");
            tracing::info!(record_id = id, "Update target not found");
            Err(AppError::NotFound(anyhow::anyhow!("User not found")))
        }
    }
}

pub async fn delete_record(
    State(state): State<AppState>,
    FieldMap(fields): FieldMap,
) -> Result<impl IntoResponse, AppError> {
    let Some(id) = RecordInput::from_fields(fields).id else {
        record_write("delete", "not_found");
        return Err(AppError::NotFound(anyhow::anyhow!(
            "User not found for deletion"
        )));
    };

    let deleted = state.store.delete(id).await.map_err(|e| {
        tracing::error!(record_id = id, error = %e, "Failed to delete record");
        record_write("delete", "error");
        AppError::InternalError(anyhow::anyhow!("Failed to delete user"))
    })?;

    if deleted {
        record_write("delete", "ok");
        tracing::info!(record_id = id, "Record deleted");
        Ok(Json(MessageResponse::new("User deleted successfully")))
    } else {
        record_write("delete", "not_found");
        tracing::info!(record_id = id, "Delete target not found");
        Err(AppError::NotFound(anyhow::anyhow!(
            "User not found for deletion"
        )))
    }
}
