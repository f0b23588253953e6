use crate::config::ConfigError;
use crate::intake::{BudgetViolation, CandidateImportError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Which side of a comparison an input error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectRole {
    Requirements,
    Profile,
}

impl SubjectRole {
    pub const fn label(self) -> &'static str {
        match self {
            SubjectRole::Requirements => "requirements",
            SubjectRole::Profile => "profile",
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Import(CandidateImportError),
    Budget {
        subject: SubjectRole,
        violation: BudgetViolation,
    },
}

impl AppError {
    pub fn budget(subject: SubjectRole, violation: BudgetViolation) -> Self {
        Self::Budget { subject, violation }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid JSON input: {}", err),
            AppError::Import(err) => write!(f, "candidate import failed: {}", err),
            AppError::Budget { subject, violation } => {
                write!(f, "{} rejected: {}", subject.label(), violation)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Budget { violation, .. } => Some(violation),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Budget { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Json(_) | AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<CandidateImportError> for AppError {
    fn from(value: CandidateImportError) -> Self {
        Self::Import(value)
    }
}
