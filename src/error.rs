use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Errors surfaced to HTTP clients. Bodies are plain JSON strings.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid user ID")]
    InvalidId,
    #[error("Invalid request payload")]
    InvalidPayload,
    #[error("User not found")]
    NotFound,
    /// Generic message only; the cause is logged where it happened.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::InvalidPayload => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_string())).into_response()
    }
}
