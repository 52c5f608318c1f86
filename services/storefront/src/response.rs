//! Success envelope shared by every endpoint

use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use common::Fetched;
use serde::Serialize;

/// Response header set when the payload came from the static fallback data
pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// `{ "success": true, "data": ..., "message": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip)]
    status: StatusCode,
    #[serde(skip)]
    fallback: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            status: StatusCode::OK,
            fallback: false,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn from_fetched(fetched: Fetched<T>) -> Self {
        let fallback = fetched.is_fallback();
        Self {
            fallback,
            ..Self::ok(fetched.data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        let fallback = self.fallback;
        let mut response = (status, Json(self)).into_response();

        if fallback {
            response
                .headers_mut()
                .insert(DATA_SOURCE_HEADER, HeaderValue::from_static("fallback"));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use common::DataSource;

    #[tokio::test]
    async fn test_fallback_responses_are_flagged() {
        let response = ApiResponse::from_fetched(Fetched {
            data: vec!["Harbour Point"],
            source: DataSource::Fallback,
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[DATA_SOURCE_HEADER], "fallback");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0], "Harbour Point");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_created_with_message() {
        let response = ApiResponse::created(42).with_message("Product created").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(DATA_SOURCE_HEADER).is_none());

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Product created");
    }
}
