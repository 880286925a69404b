use crate::{auth::AuthUser, error::StoreError, models::Folder, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct FolderBody {
    name: String,
}

/// GET /api/folders
pub async fn list(_auth: AuthUser, State(state): State<Arc<AppState>>) -> Json<Vec<Folder>> {
    Json(state.store.all_folders().await)
}

/// POST /api/folders
pub async fn create(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<FolderBody>,
) -> (StatusCode, Json<Folder>) {
    let folder = state.store.create_folder(&body.name, &auth.user_id).await;
    (StatusCode::CREATED, Json(folder))
}

/// PUT /api/folders/:id
pub async fn rename(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<FolderBody>,
) -> Result<Json<Folder>, StoreError> {
    Ok(Json(state.store.rename_folder(&id, &body.name).await?))
}

/// DELETE /api/folders/:id
///
/// Links that referenced the folder are re-homed to "no folder" in the same
/// store operation.
pub async fn remove(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StoreError> {
    state.store.delete_folder(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
