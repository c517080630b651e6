//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 处理器错误类型
#[derive(Debug)]
pub enum AppError {
    NotFound,
    InvalidPayload,
    Store(StoreError),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            other => AppError::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Product not found"),
            AppError::InvalidPayload => (StatusCode::BAD_REQUEST, "Invalid request payload"),
            AppError::Store(e) => {
                error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_body_is_fixed() {
        let (status, body) = body_of(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "Product not found" }));
    }

    #[tokio::test]
    async fn invalid_payload_body_is_fixed() {
        let (status, body) = body_of(AppError::InvalidPayload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Invalid request payload" }));
    }

    #[test]
    fn store_not_found_becomes_not_found() {
        assert!(matches!(
            AppError::from(StoreError::NotFound),
            AppError::NotFound
        ));
    }

    #[cfg(feature = "database")]
    #[tokio::test]
    async fn database_error_is_internal() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
