use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced to API callers as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUser,

    #[error("Invalid registration code")]
    InvalidCode,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token is missing!")]
    MissingToken,

    #[error("Token has expired!")]
    ExpiredToken,

    #[error("Invalid token!")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateUser | ApiError::InvalidCode => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials
            | ApiError::MissingToken
            | ApiError::ExpiredToken
            | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Aggregation(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal server error".to_string()
            }
            ApiError::Aggregation(msg) => {
                error!(message = %msg, "aggregation error");
                self.to_string()
            }
            other => {
                warn!(status = %status, message = %other, "request rejected");
                other.to_string()
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Malformed or mistyped request bodies are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DuplicateUser.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCode.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("no".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("gone".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("db down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let res = ApiError::Internal(anyhow::anyhow!("password=hunter2")).into_response();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["message"], "Internal server error");
    }
}
