//! Consistent JSON error responses.
//!
//! Every failure leaves the API as
//! `{"code": "...", "message": "...", "details": [{"field": "...", "messages": [...]}]}`.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tinyledger_core::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    EntityNotFound,
    EntityAlreadyExists,
    InvalidMoneyOperation,
    BadRequest,
    RouteNotFound,
    MethodNotAllowed,
    InternalServerError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiFieldError {
    pub field: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ApiErrorBody<'a> {
    code: ErrorCode,
    message: &'a str,
    details: &'a [ApiFieldError],
}

/// Error returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
    details: Vec<ApiFieldError>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, message)
    }

    /// Request body failed field validation.
    pub fn invalid_body(errors: FieldErrors) -> Self {
        Self {
            details: errors.into_details(),
            ..Self::bad_request("Request body is invalid")
        }
    }

    /// Unexpected failure. The cause is logged and never sent to the client.
    pub fn internal(cause: impl core::fmt::Display) -> Self {
        tracing::error!(error = %cause, "internal server error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Internal server error",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[ApiFieldError] {
        &self.details
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.code,
            message: &self.message,
            details: &self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, ErrorCode::EntityNotFound, message)
            }
            DomainError::AlreadyExists { .. } => {
                Self::new(StatusCode::CONFLICT, ErrorCode::EntityAlreadyExists, message)
            }
            DomainError::InvalidMoneyOperation(_) => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidMoneyOperation,
                message,
            ),
            DomainError::Validation(_) | DomainError::InvalidId(_) => Self::bad_request(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        if status.is_server_error() {
            return Self::internal(rejection.body_text());
        }
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, ErrorCode::BadRequest, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            return Self::internal(rejection.body_text());
        }
        Self::bad_request(rejection.body_text())
    }
}

/// Field validation failures, grouped by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    by_field: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.by_field
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::invalid_body(self))
        }
    }

    fn into_details(self) -> Vec<ApiFieldError> {
        self.by_field
            .into_iter()
            .map(|(field, messages)| ApiFieldError { field, messages })
            .collect()
    }
}
