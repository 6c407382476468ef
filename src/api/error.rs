use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use thiserror::Error;
use crate::service::AggregateError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "Method not allowed",
            )
                .into_response(),
            ApiError::Internal(error) => {
                let body = Json(json!({
                    "message": "Failed to fetch transactions",
                    "error": error,
                }));

                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Turns a handler panic into the same 500 body as any other internal failure.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let error = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error occurred".to_string()
    };

    tracing::error!("Handler panicked: {}", error);
    ApiError::Internal(error).into_response()
}
