use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error;
use std::fmt;

use crate::barcode;

/// The primary error type for the application.
///
/// Every handler returns `AppResult<T>`; the `IntoResponse` impl turns each variant
/// into a JSON error body with a stable `error.code`.
#[derive(Debug)]
pub enum AppError {
    /// For internal server errors that are not expected to be handled by the client.
    Internal(anyhow::Error),
    /// For client errors due to invalid requests.
    BadRequest(String),
    /// For when a requested resource is not found.
    NotFound(String),
    /// For when a request conflicts with an existing record (duplicate unique key).
    Conflict(String),
    /// For when a service is temporarily unavailable.
    ServiceUnavailable(String),
    /// For errors related to database operations.
    Database(String),
    /// For when a specific field in a request fails validation.
    ValidationError {
        /// The name of the field that failed validation.
        field: String,
        /// A message describing the validation error.
        message: String,
    },
    /// A barcode was rejected by the validator. The record must not be persisted.
    Barcode(barcode::ValidationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::ValidationError { field, message } => {
                write!(f, "Validation error on field '{}': {}", field, message)
            }
            AppError::Barcode(e) => write!(f, "Invalid barcode: {}", e),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            AppError::Barcode(e) => Some(e),
            _ => None,
        }
    }
}

/// Error code and structured details for a rejected barcode.
fn barcode_error_parts(err: &barcode::ValidationError) -> (&'static str, Option<serde_json::Value>) {
    use barcode::ValidationError as V;
    match err {
        V::Empty(_) => ("EMPTY_BARCODE", None),
        V::MissingSymbology(_) => ("MISSING_BARCODE_TYPE", None),
        V::UnknownSymbology(e) => (
            "UNKNOWN_BARCODE_TYPE",
            Some(json!({
                "barcode_type": e.tag,
                "supported": barcode::Symbology::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            })),
        ),
        V::BadFormat(e) => (
            "INVALID_BARCODE_FORMAT",
            Some(json!({ "barcode_type": e.symbology, "barcode": e.value })),
        ),
        V::BadChecksum(e) => (
            "INVALID_BARCODE_CHECKSUM",
            Some(json!({
                "barcode_type": e.symbology,
                "barcode": e.value,
                "expected_check_digit": e.expected,
                "actual_check_digit": e.actual,
            })),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                let error_id = uuid::Uuid::new_v4();
                tracing::error!("Error ID: {}", error_id);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg, None)
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    Some(json!({ "details": msg })),
                )
            }
            AppError::ValidationError { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Validation failed for field '{}'", field),
                Some(json!({ "field": field, "message": message })),
            ),
            AppError::Barcode(e) => {
                let (code, details) = barcode_error_parts(&e);
                (StatusCode::UNPROCESSABLE_ENTITY, code, e.to_string(), details)
            }
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["error"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<barcode::ValidationError> for AppError {
    fn from(err: barcode::ValidationError) -> Self {
        AppError::Barcode(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    AppError::Conflict(format!("Duplicate value: {}", db_err.message()))
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    AppError::NotFound(format!("Referenced record does not exist: {}", db_err.message()))
                }
                sqlx::error::ErrorKind::CheckViolation => {
                    AppError::BadRequest(format!("Constraint violated: {}", db_err.message()))
                }
                _ => AppError::Database(format!("Database error: {}", db_err.message())),
            },
            sqlx::Error::PoolTimedOut => {
                AppError::ServiceUnavailable("Database connection pool timed out".to_string())
            }
            _ => AppError::Database(format!("Database error: {}", err)),
        }
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

/// An extension trait for `Option` that provides a convenient way to convert
/// an `Option` to a `Result` with a `NotFound` error.
pub trait OptionExt<T> {
    /// Converts `None` into `AppError::NotFound("<entity> not found")`.
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
    }
}

/// Field checks shared by the record handlers.
///
/// The store only enforces uniqueness, foreign keys and a few CHECK constraints, so
/// length limits from the data model are checked here before any insert.
pub mod validation {
    use super::*;

    fn invalid(field: &str, message: String) -> AppError {
        AppError::ValidationError { field: field.to_string(), message }
    }

    /// Trims `value` and checks that it is non-empty and at most `max_chars` long.
    pub fn required_text(value: &str, field: &str, max_chars: usize) -> AppResult<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid(field, format!("{} cannot be empty", field)));
        }
        max_chars_ok(trimmed, field, max_chars)?;
        Ok(trimmed.to_string())
    }

    /// Like [`required_text`] but `None` and blank strings collapse to `None`.
    pub fn optional_text(value: Option<&str>, field: &str, max_chars: usize) -> AppResult<Option<String>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => {
                max_chars_ok(v, field, max_chars)?;
                Ok(Some(v.to_string()))
            }
        }
    }

    fn max_chars_ok(value: &str, field: &str, max_chars: usize) -> AppResult<()> {
        let len = value.chars().count();
        if len > max_chars {
            return Err(invalid(
                field,
                format!("{} must be at most {} characters, got {}", field, max_chars, len),
            ));
        }
        Ok(())
    }

    /// Loose e-mail shape check: one `@` with text on both sides and a dot in the domain.
    pub fn email(value: &str, field: &str, max_chars: usize) -> AppResult<String> {
        let v = required_text(value, field, max_chars)?;
        let ok = match v.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
        if !ok || v.chars().any(char::is_whitespace) {
            return Err(invalid(field, format!("'{}' is not a valid e-mail address", v)));
        }
        Ok(v)
    }

    /// Validates that a count is zero or positive.
    pub fn non_negative(value: i64, field: &str) -> AppResult<()> {
        if value < 0 {
            return Err(invalid(field, format!("Value must not be negative, got {}", value)));
        }
        Ok(())
    }

    /// Validates that an amount is a finite number that is zero or positive.
    pub fn non_negative_amount(value: f64, field: &str) -> AppResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(field, format!("Value must be a non-negative number, got {}", value)));
        }
        Ok(())
    }
}
