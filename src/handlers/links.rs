use crate::{
    auth::AuthUser,
    error::StoreError,
    models::{AbVariant, Link, LinkPatch, NewLink, Tag},
    store::{ClickStats, LinkQuery},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// GET /api/links?folder=&search=
pub async fn list(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<LinkQuery>,
) -> Json<Vec<Link>> {
    Json(state.store.all_links(&query).await)
}

/// GET /api/links/:id
pub async fn get_one(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Link>, StoreError> {
    Ok(Json(state.store.link_by_id(&id).await?))
}

/// POST /api/links
///
/// The owner defaults to the session's user when the body doesn't name one.
pub async fn create(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<NewLink>,
) -> (StatusCode, Json<Link>) {
    if body.user_id.is_none() {
        body.user_id = Some(auth.user_id);
    }
    let link = state.store.create_link(body).await;
    (StatusCode::CREATED, Json(link))
}

/// PUT /api/links/:id
pub async fn update(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<LinkPatch>,
) -> Result<Json<Link>, StoreError> {
    Ok(Json(state.store.update_link(&id, patch).await?))
}

/// DELETE /api/links/:id
pub async fn remove(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StoreError> {
    state.store.delete_link(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/links/:id/stats
pub async fn stats(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ClickStats>, StoreError> {
    Ok(Json(state.store.link_stats(&id).await?))
}

/// GET /api/links/:id/tags
pub async fn tags(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Tag>>, StoreError> {
    // Existence check first so an unknown link 404s instead of yielding [].
    state.store.link_by_id(&id).await?;
    Ok(Json(state.store.tags_for_link(&id).await))
}

/// GET /api/links/:id/variants
pub async fn variants(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AbVariant>>, StoreError> {
    state.store.link_by_id(&id).await?;
    Ok(Json(state.store.variants_for_link(&id).await))
}
