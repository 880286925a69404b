use crate::{
    auth::AdminUser,
    models::{Link, User},
    store::LinkQuery,
    AppState,
};
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/admin/users — every account, admin role required.
pub async fn users(_admin: AdminUser, State(state): State<Arc<AppState>>) -> Json<Vec<User>> {
    Json(state.store.all_users().await)
}

/// GET /api/admin/links — every link across all users.
pub async fn links(_admin: AdminUser, State(state): State<Arc<AppState>>) -> Json<Vec<Link>> {
    Json(state.store.all_links(&LinkQuery::default()).await)
}
