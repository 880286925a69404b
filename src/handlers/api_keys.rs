use crate::{auth::AuthUser, error::StoreError, models::ApiKey, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ApiKeyBody {
    name: String,
}

/// GET /api/api-keys — keys belonging to the session's user.
pub async fn list(auth: AuthUser, State(state): State<Arc<AppState>>) -> Json<Vec<ApiKey>> {
    Json(state.store.api_keys_for_user(&auth.user_id).await)
}

/// POST /api/api-keys
pub async fn create(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ApiKeyBody>,
) -> (StatusCode, Json<ApiKey>) {
    let key = state.store.create_api_key(&auth.user_id, &body.name).await;
    (StatusCode::CREATED, Json(key))
}

/// DELETE /api/api-keys/:id
pub async fn remove(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StoreError> {
    state.store.delete_api_key(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
