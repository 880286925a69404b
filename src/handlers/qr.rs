use crate::{auth::AuthUser, error::StoreError, models::QrCode, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

/// GET /api/qr/:link_id — an existing QR code only; 404 when none was ever
/// generated for the link.
pub async fn get_one(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(link_id): Path<String>,
) -> Result<Json<QrCode>, StoreError> {
    Ok(Json(state.store.qr_code_for_link(&link_id).await?))
}

/// POST /api/qr/:link_id — idempotent get-or-create. Calling this twice for
/// the same link returns the same image URL.
pub async fn generate(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(link_id): Path<String>,
) -> Result<Json<QrCode>, StoreError> {
    Ok(Json(state.store.generate_qr_code(&link_id).await?))
}
