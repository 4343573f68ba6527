//! API error type and its HTTP mapping.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::error::SignalError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("site \"{0}\" not found")]
    SiteNotFound(String),

    #[error("invalid `now` \"{0}\": expected an RFC 3339 timestamp")]
    InvalidNow(String),

    #[error("invalid `{field}` \"{value}\": expected a whole number of hours")]
    InvalidNumber { field: &'static str, value: String },

    #[error("malformed query string: {0}")]
    BadQuery(#[from] QueryRejection),

    #[error(transparent)]
    Signal(#[from] SignalError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::SiteNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidNow(_)
            | Self::InvalidNumber { .. }
            | Self::BadQuery(_)
            | Self::Signal(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            Self::SiteNotFound(_) => None,
            Self::InvalidNow(_) => Some("now".to_string()),
            Self::InvalidNumber { field, .. } => Some((*field).to_string()),
            Self::BadQuery(_) => Some("query".to_string()),
            Self::Signal(e) => Some(e.field().to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            field: self.field(),
        };
        (self.status(), Json(body)).into_response()
    }
}
