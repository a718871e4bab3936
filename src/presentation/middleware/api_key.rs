use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::presentation::error::ApiError;

pub const API_KEY_HEADER: &str = "key";

#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }
}

/// Reject requests whose `key` header is absent (403) or wrong (401).
pub async fn require_api_key(
    State(expected): State<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(supplied) = request.headers().get(API_KEY_HEADER) else {
        return Err(ApiError::forbidden("API Key is missing."));
    };

    if supplied.as_bytes() != expected.0.as_bytes() {
        tracing::warn!(path = %request.uri().path(), "Request with invalid API key");
        return Err(ApiError::unauthorized("Invalid API Key."));
    }

    Ok(next.run(request).await)
}
