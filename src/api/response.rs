//! Response types for the tuition office API.
//!
//! This module defines the error body returned by every endpoint and the
//! mapping from engine errors to HTTP status codes.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::calculation::AttendanceSummary;
use crate::error::EngineError;
use crate::models::StaffAttendance;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub organization: String,
}

/// Body of `GET /attendance/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDay {
    pub date: chrono::NaiveDate,
    pub present_count: usize,
    pub records: Vec<StaffAttendance>,
}

/// Body of `GET /staff/:id/attendance/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAttendanceSummary {
    pub staff_id: String,
    /// "March 2026", or "Last 12 Months" when no month was asked for.
    pub period: String,
    pub summary: AttendanceSummary,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 404 for a record a read could not find.
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new(
                "NOT_FOUND",
                format!("No record '{}' in {}", id, collection),
            ),
        }
    }

    /// Maps a JSON body rejection, logging it under the request's correlation id.
    pub fn from_json_rejection(rejection: JsonRejection, correlation_id: Uuid) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                if body_text.contains("missing field") || body_text.contains("Invalid field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::bad_request(error)
    }

    /// Maps a query string rejection.
    pub fn from_query_rejection(rejection: QueryRejection, correlation_id: Uuid) -> Self {
        let message = rejection.body_text();
        warn!(correlation_id = %correlation_id, error = %message, "Query string rejected");
        Self::bad_request(ApiError::validation_error(message))
    }

    /// Maps a path parameter rejection.
    pub fn from_path_rejection(rejection: PathRejection, correlation_id: Uuid) -> Self {
        let message = rejection.body_text();
        warn!(correlation_id = %correlation_id, error = %message, "Path parameter rejected");
        Self::bad_request(ApiError::validation_error(message))
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::StoreUnavailable { message } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "STORE_UNAVAILABLE",
                    "The record store could not be reached; try again",
                    message,
                ),
            },
            EngineError::Validation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid field '{}': {}", field, message),
                    field,
                ),
            },
            EngineError::RecordNotFound { collection, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "NOT_FOUND",
                    format!("Record '{}' not found in collection '{}'", id, collection),
                ),
            },
            EngineError::InvalidTransition { id, message } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "INVALID_TRANSITION",
                    message,
                    format!("Record '{}'", id),
                ),
            },
            EngineError::DuplicateKey { collection, key } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "DUPLICATE_KEY",
                    format!("Could not issue a unique key in '{}'", collection),
                    format!("Last candidate: {}", key),
                ),
            },
            EngineError::Serialization { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("SERIALIZATION_ERROR", "Stored record is unreadable", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_store_unavailable_is_503() {
        let response: ApiErrorResponse = EngineError::StoreUnavailable {
            message: "offline".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.error.code, "STORE_UNAVAILABLE");
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(EngineError, StatusCode)> = vec![
            (EngineError::validation("amount", "must be greater than zero"), StatusCode::BAD_REQUEST),
            (
                EngineError::RecordNotFound {
                    collection: "staff".to_string(),
                    id: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::InvalidTransition {
                    id: "x".to_string(),
                    message: "salary is already paid".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::DuplicateKey {
                    collection: "staff".to_string(),
                    key: "DT-S-1000".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::Serialization {
                    message: "bad".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
        }
    }
}
