use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Uniform failure value for the entity handlers: a human-readable message
/// plus an HTTP-style status code. Callers match on the variant; the HTTP
/// layer serializes it as `{"message": ..., "status": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// An upstream source (metadata API, statistics input) failed.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
