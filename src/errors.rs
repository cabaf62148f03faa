//! # Error Handling
//!
//! Two layers of errors:
//!
//! - [`RepositoryError`] is what repository operations fail with. A database error,
//!   a field name that is not registered, or an include that is not a relation.
//! - [`ApiError`] is what the controller answers with. Every variant maps to one
//!   HTTP status and a JSON body `{"error": "...", "details": [...]}`.
//!
//! Repository failures reaching a handler become `500` carrying the error's text,
//! and are logged with `tracing`. The one exception is the field search endpoint,
//! which returns `RepositoryError` as-is: its response is a bare `500` with no body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use uuid::Uuid;

use crate::validation::ValidationErrors;

/// Failure of a repository operation.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("{resource} has no public field named '{field}'")]
    UnknownField {
        resource: &'static str,
        field: String,
    },

    #[error("'{relation}' is not a relation of {resource}")]
    UnknownRelation {
        resource: &'static str,
        relation: String,
    },
}

/// Errors that escape a handler without being mapped to an [`ApiError`].
///
/// The client gets an empty `500`; the details only go to the log.
impl IntoResponse for RepositoryError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Unhandled repository error");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Outcome of a rejected or failed request.
///
/// The `Display` text is what the client reads in `error`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{resource} with ID '{id}' not found")]
    NotFound { resource: &'static str, id: Uuid },

    /// Body or path identifier that could not be read.
    #[error("{0}")]
    BadRequest(String),

    /// Payload that was read but broke its rules.
    #[error("Validation failed")]
    Invalid(ValidationErrors),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        cause: Option<RepositoryError>,
    },
}

impl ApiError {
    #[must_use]
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// A server-side failure with a fixed message and nothing underneath.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            cause: None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal {
                cause: Some(cause), ..
            } => tracing::error!(error = ?cause, "{self}"),
            Self::Internal { .. } => tracing::error!("{self}"),
            _ => tracing::debug!(%status, error = %self, "Request rejected"),
        }

        let details = match &self {
            Self::Invalid(rules) => Some(rules.errors().iter().map(ToString::to_string).collect()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Every repository failure that reaches a handler is a 500 carrying its text.
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal {
            message: err.to_string(),
            cause: Some(err),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(rules: ValidationErrors) -> Self {
        Self::Invalid(rules)
    }
}
