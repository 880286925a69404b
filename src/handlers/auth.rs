use crate::{
    auth::{AuthUser, SESSION_COOKIE},
    error::StoreError,
    AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    #[allow(dead_code)]
    password: String,
}

#[derive(Deserialize)]
pub struct RegisterBody {
    name: String,
    email: String,
    #[allow(dead_code)]
    password: String,
}

fn session_cookie(token: String, hours: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(hours as i64 * 3600))
        .build()
}

/// POST /api/auth/login
///
/// Mock semantics: any password is accepted for a known active email. The
/// password field is still required so the request shape matches a real
/// backend's.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Response {
    let Some(user) = state.store.record_login(&body.email).await else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    };

    let token = state.sessions.create(&user.id);
    let cookie = session_cookie(token, state.config.session_duration_hours);

    (jar.add(cookie), Json(user)).into_response()
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RegisterBody>,
) -> Response {
    if state.store.user_by_email(&body.email).await.is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Email already registered" })),
        )
            .into_response();
    }

    let user = state.store.create_user(&body.name, &body.email).await;
    let token = state.sessions.create(&user.id);
    let cookie = session_cookie(token, state.config.session_duration_hours);

    (StatusCode::CREATED, jar.add(cookie), Json(user)).into_response()
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }

    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.add(removal), Json(json!({ "message": "Logged out" }))).into_response()
}

/// GET /api/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, StoreError> {
    let user = state.store.user_by_id(&auth.user_id).await?;
    let subscription = state.store.subscription_for_user(&auth.user_id).await;
    Ok(Json(json!({ "user": user, "subscription": subscription })))
}
