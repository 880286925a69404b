//! linkstub: a seedable in-memory mock backend for a link-management
//! dashboard. The [`store::LinkStore`] can be used directly as a test
//! double, or served over HTTP via [`app`].

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use auth::SessionStore;
use store::LinkStore;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: config::AppConfig,
    pub store: LinkStore,
    pub sessions: SessionStore,
}

/// Build the full application router over the given state.
pub fn app(state: Arc<AppState>) -> axum::Router {
    handlers::router(state)
}
