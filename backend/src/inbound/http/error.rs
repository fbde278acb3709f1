//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into `{"detail": ...}` bodies with
//! consistent status codes.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message shown to clients in place of internal error details.
pub const REDACTED_INTERNAL_MESSAGE: &str = "Internal server error";

/// Error envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    #[schema(example = "Invalid email or password")]
    pub detail: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for(error: &Error) -> ErrorBody {
    let detail = if error.is_public() {
        error.message().to_owned()
    } else {
        REDACTED_INTERNAL_MESSAGE.to_owned()
    };
    ErrorBody {
        detail,
        trace_id: error.trace_id().map(str::to_owned),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(
                detail = self.message(),
                details = ?self.details(),
                trace_id = self.trace_id(),
                "request failed with internal error"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if matches!(self.code(), ErrorCode::Unauthorized) {
            builder.insert_header((WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(body_for(self))
    }
}

/// Map JSON extractor failures: shape mismatches are validation errors
/// (422), anything else about the payload is a bad request (400).
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let mapped = match &err {
        JsonPayloadError::Deserialize(inner) if inner.is_data() => {
            Error::unprocessable(inner.to_string())
        }
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            Error::invalid_request("Request body is too large")
        }
        _ => Error::invalid_request(format!("Invalid JSON body: {err}")),
    };
    mapped.into()
}

/// Query string failures are validation errors.
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::unprocessable(err.to_string()).into()
}

/// Malformed path segments, such as a vendor id that is not a UUID, are
/// validation errors.
fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::unprocessable(err.to_string()).into()
}

/// JSON extractor configuration emitting the `{"detail"}` envelope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Query extractor configuration emitting the `{"detail"}` envelope.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

/// Path extractor configuration emitting the `{"detail"}` envelope.
#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}
