use crate::models::{User, UserRole};
use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use dashmap::DashMap;
use serde_json::json;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";

// ── Session Store ──────────────────────────────────────────────────────────

struct Session {
    user_id: String,
    created_at: Instant,
}

/// In-memory session store mapping a session token (UUID) to the user it
/// belongs to. Tokens expire after `session_duration`; expired entries are
/// pruned opportunistically on every login.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    pub session_duration: Duration,
}

impl SessionStore {
    pub fn new(session_duration_hours: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            session_duration: Duration::from_secs(session_duration_hours * 3600),
        }
    }

    /// Create a new session for `user_id` and return its token.
    pub fn create(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .retain(|_, session| session.created_at.elapsed() < self.session_duration);
        self.sessions.insert(
            token.clone(),
            Session {
                user_id: user_id.to_owned(),
                created_at: Instant::now(),
            },
        );
        token
    }

    /// The owning user id, if the token exists and has not expired.
    pub fn user_id(&self, token: &str) -> Option<String> {
        self.sessions.get(token).and_then(|session| {
            (session.created_at.elapsed() < self.session_duration)
                .then(|| session.user_id.clone())
        })
    }

    /// Invalidate a specific session (logout).
    pub fn remove(&self, token: &str) {
        self.sessions.remove(token);
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Not authenticated" })),
    )
        .into_response()
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": "Admin access required" })),
    )
        .into_response()
}

// ── AuthUser extractor ─────────────────────────────────────────────────────

/// Extractor that enforces authentication on any handler that includes it as
/// a parameter. If the request carries a valid `session_id` cookie the
/// extractor yields the session's user id; otherwise it short-circuits with
/// a 401 JSON body so the handler never runs.
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let user_id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| state.sessions.user_id(cookie.value()));

        match user_id {
            Some(user_id) => Ok(AuthUser { user_id }),
            None => Err(unauthorized()),
        }
    }
}

// ── AdminUser extractor ────────────────────────────────────────────────────

/// Like [`AuthUser`], but additionally requires the session's user to carry
/// the admin role. Rejects with 403 for ordinary users.
pub struct AdminUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let state = Arc::<AppState>::from_ref(state);

        let user = state
            .store
            .user_by_id(&auth.user_id)
            .await
            .map_err(|_| unauthorized())?;

        if user.role != UserRole::Admin {
            return Err(forbidden());
        }
        Ok(AdminUser(user))
    }
}
