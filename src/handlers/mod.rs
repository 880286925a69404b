pub mod admin;
pub mod api_keys;
pub mod auth;
pub mod folders;
pub mod links;
pub mod qr;
pub mod stats;
pub mod tags;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// The full route table: everything the dashboard's API client calls, under
/// `/api`, plus an unauthenticated health check.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Links
        .route("/links", get(links::list).post(links::create))
        .route(
            "/links/:id",
            get(links::get_one).put(links::update).delete(links::remove),
        )
        .route("/links/:id/stats", get(links::stats))
        .route("/links/:id/tags", get(links::tags))
        .route("/links/:id/variants", get(links::variants))
        // Folders
        .route("/folders", get(folders::list).post(folders::create))
        .route(
            "/folders/:id",
            put(folders::rename).delete(folders::remove),
        )
        // Tags
        .route("/tags", get(tags::list).post(tags::create))
        .route("/tags/:id", delete(tags::remove))
        // QR codes
        .route("/qr/:link_id", get(qr::get_one).post(qr::generate))
        // Stats
        .route("/stats/summary", get(stats::summary))
        .route("/stats/link/:id", get(stats::link))
        // API keys
        .route("/api-keys", get(api_keys::list).post(api_keys::create))
        .route("/api-keys/:id", delete(api_keys::remove))
        // Admin
        .route("/admin/users", get(admin::users))
        .route("/admin/links", get(admin::links));

    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
