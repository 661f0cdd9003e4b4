use std::fmt;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::warn;

use crate::validation::{FieldError, Rule};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntityKind {
    Film,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Film => f.write_str("film"),
            EntityKind::User => f.write_str("user"),
        }
    }
}

/// Outcome of a rejected catalog operation. The store is never modified when
/// one of these is returned.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} id must be specified")]
    MissingId { entity: EntityKind },

    #[error("{entity} with id = {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    #[error(transparent)]
    Validation(#[from] FieldError),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    /// The request could not be turned into a candidate record.
    Request { status: StatusCode, message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Core(err) => err.fmt(f),
            AppError::Request { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Request { status: rejection.status(), message: rejection.body_text() }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Request { status: rejection.status(), message: rejection.body_text() }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<Rule>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Core(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Core(CoreError::MissingId { .. } | CoreError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            },
            AppError::Request { status, .. } => *status,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Core(CoreError::MissingId { .. }) => "missing_id",
            AppError::Core(CoreError::NotFound { .. }) => "not_found",
            AppError::Core(CoreError::Validation(_)) => "validation",
            AppError::Request { .. } => "bad_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rule = match &self {
            AppError::Core(CoreError::Validation(err)) => Some(err.rule),
            _ => None,
        };
        let status = self.status();
        let body = ErrorBody { error: self.kind(), message: self.to_string(), rule };
        warn!(%status, error = %body.message, "request rejected");
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
