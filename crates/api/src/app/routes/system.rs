use axum::http::{Method, StatusCode, Uri};

use crate::app::errors::{ApiError, ErrorCode};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Fallback for paths no route matches.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        ErrorCode::RouteNotFound,
        format!("No route for {method} {}", uri.path()),
    )
}

/// Fallback for a known path hit with a method it does not serve.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed,
        format!("Method {method} is not supported for {}", uri.path()),
    )
}
