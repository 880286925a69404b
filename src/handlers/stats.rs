use crate::{
    auth::AuthUser,
    error::StoreError,
    store::{ClickStats, StatsSummary},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

/// GET /api/stats/summary
pub async fn summary(_auth: AuthUser, State(state): State<Arc<AppState>>) -> Json<StatsSummary> {
    Json(state.store.stats_summary().await)
}

/// GET /api/stats/link/:id
pub async fn link(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ClickStats>, StoreError> {
    Ok(Json(state.store.link_stats(&id).await?))
}
