//! Backup endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use crate::api::state::AppState;
use crate::store::{SnapshotInfo, StoreResult};

/// Response for POST /api/backup
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub filename: String,
}

/// Response for GET /api/backups
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub backups: Vec<SnapshotInfo>,
    pub count: usize,
    /// Configured retention limit
    pub retention: usize,
}

/// Response for GET /api/backup/latest
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestResponse {
    pub success: bool,
    /// `null` when no backup exists yet
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for GET /api/backup/:filename
#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub success: bool,
    pub data: Value,
}

/// Run a store operation on the blocking pool
async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::internal(format!("Backup task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// POST /api/backup - Save the request body as a new backup
pub async fn save_backup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(payload) = payload?;
    let store = state.store.clone();

    let saved = run_blocking(move || store.save(&payload)).await?;

    Ok(Json(SaveResponse {
        success: true,
        filename: saved.filename,
    }))
}

/// GET /api/backups - List backups, newest first
pub async fn list_backups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse>, ApiError> {
    let store = state.store.clone();
    let backups = run_blocking(move || store.list()).await?;

    Ok(Json(ListResponse {
        success: true,
        count: backups.len(),
        backups,
        retention: state.store.keep_count(),
    }))
}

/// GET /api/backup/latest - Latest backup, `data: null` on a fresh install
pub async fn get_latest_backup(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LatestResponse>, ApiError> {
    let store = state.store.clone();

    let response = match run_blocking(move || store.latest()).await? {
        Some(latest) => LatestResponse {
            success: true,
            data: latest.data,
            backup_time: Some(
                latest
                    .info
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            filename: Some(latest.info.filename),
            message: None,
        },
        None => LatestResponse {
            success: true,
            data: Value::Null,
            filename: None,
            backup_time: None,
            message: Some("No backups found".to_string()),
        },
    };

    Ok(Json(response))
}

/// GET /api/backup/:filename - Specific backup
pub async fn get_backup(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<BackupResponse>, ApiError> {
    let store = state.store.clone();
    let data = run_blocking(move || store.get(&filename)).await?;

    Ok(Json(BackupResponse {
        success: true,
        data,
    }))
}
