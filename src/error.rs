use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures the store can produce. Lookups by id are the only fallible
/// operations in the mock layer, so this stays deliberately small.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The named entity ("Link", "Folder", ...) has no row with the
    /// requested id.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl StoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// The dashboard client expects every failure as a JSON body with a
/// `message` field.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
