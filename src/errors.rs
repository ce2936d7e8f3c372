use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type AclResult<T> = Result<T, AclError>;

#[derive(thiserror::Error, Debug)]
pub enum AclError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl AclError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AclError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AclError::Forbidden(_) => StatusCode::FORBIDDEN,
            AclError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AclError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AclError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AclError::Unauthorized(_) => "unauthorized",
            AclError::Forbidden(_) => "forbidden",
            AclError::BadRequest(_) => "bad_request",
            AclError::Configuration(_) => "configuration",
            AclError::Internal(_) => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AclError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };

        (self.status(), Json(payload)).into_response()
    }
}

impl From<anyhow::Error> for AclError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value.to_string())
    }
}
