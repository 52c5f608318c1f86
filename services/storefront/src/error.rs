//! Custom error types for the storefront service

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request, multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use common::error::{ConstraintViolation, DatabaseError};
use media::MediaError;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the storefront service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing or invalid credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Login with an unknown email, a wrong password or an inactive account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated but not allowed
    #[error("Forbidden")]
    Forbidden,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Upload or image processing error
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid email or password".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "You do not have permission to perform this action".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Database(e) => match e.constraint_violation() {
                Some(ConstraintViolation::Unique) => (
                    StatusCode::BAD_REQUEST,
                    "validation",
                    "A record with this value already exists".to_string(),
                ),
                Some(ConstraintViolation::ForeignKey) => (
                    StatusCode::BAD_REQUEST,
                    "validation",
                    "Referenced record does not exist".to_string(),
                ),
                Some(ConstraintViolation::NotNull) | Some(ConstraintViolation::Check) => (
                    StatusCode::BAD_REQUEST,
                    "validation",
                    "A field has an invalid value".to_string(),
                ),
                None => internal(),
            },
            ApiError::Media(MediaError::Processing(_)) => (
                StatusCode::BAD_REQUEST,
                "validation",
                "Failed to process image".to_string(),
            ),
            ApiError::Media(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, "validation", e.to_string())
            }
            ApiError::Media(_) | ApiError::InternalServerError => internal(),
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "Internal server error".to_string(),
    )
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e.into())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = self.parts();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "success": false,
            "error": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body extractor whose rejections use the error envelope
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::Validation(rejection.body_text()))?;

        Ok(JsonBody(value))
    }
}

/// Query string extractor whose rejections use the error envelope
pub struct QueryParams<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| ApiError::Validation(rejection.body_text()))?;

        Ok(QueryParams(value))
    }
}
