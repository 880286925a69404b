use crate::{auth::AuthUser, error::StoreError, models::Tag, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct TagBody {
    name: String,
}

/// GET /api/tags
pub async fn list(_auth: AuthUser, State(state): State<Arc<AppState>>) -> Json<Vec<Tag>> {
    Json(state.store.all_tags().await)
}

/// POST /api/tags
pub async fn create(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<TagBody>,
) -> (StatusCode, Json<Tag>) {
    let tag = state.store.create_tag(&body.name).await;
    (StatusCode::CREATED, Json(tag))
}

/// DELETE /api/tags/:id
///
/// Cascades: every link association for the tag is removed with it.
pub async fn remove(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StoreError> {
    state.store.delete_tag(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
