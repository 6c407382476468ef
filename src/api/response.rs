use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::error::ApiError;

/// JSON body marked `Cache-Control: no-cache`.
///
/// Freshness is governed by the service's own cache, so clients and proxies
/// must not hold on to responses.
pub struct NoCacheJson<T>(pub T);

impl<T: Serialize> IntoResponse for NoCacheJson<T> {
    fn into_response(self) -> Response {
        let json = match serde_json::to_string(&self.0) {
            Ok(json) => json,
            Err(e) => return ApiError::Internal(e.to_string()).into_response(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        (StatusCode::OK, headers, json).into_response()
    }
}
