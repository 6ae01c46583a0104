//! Unified error types for the reviewer assignment API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors (closed taxonomy + unclassified storage failures)
//! - `ConfigError`: Startup configuration errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// External-status category of a domain error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    ClientError,
    Conflict,
    Internal,
}

impl ErrorCategory {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::ClientError => StatusCode::BAD_REQUEST,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Pull request id collision on create
    #[error("Pull request already exists: {0}")]
    AlreadyExists(String),

    #[error("Team already exists: {0}")]
    TeamExists(String),

    #[error("User has no team: {0}")]
    NoTeam(String),

    #[error("Pull request is merged: {0}")]
    PrMerged(String),

    #[error("Reviewer is not assigned: {0}")]
    NotAssigned(String),

    #[error("No active replacement candidate: {0}")]
    NoCandidate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::AlreadyExists(_) => "PR_EXISTS",
            DomainError::TeamExists(_) => "TEAM_EXISTS",
            DomainError::NoTeam(_) => "NO_TEAM",
            DomainError::PrMerged(_) => "PR_MERGED",
            DomainError::NotAssigned(_) => "NOT_ASSIGNED",
            DomainError::NoCandidate(_) => "NO_CANDIDATE",
            DomainError::Database(_) | DomainError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::NotFound(_) | DomainError::NoTeam(_) => ErrorCategory::NotFound,
            DomainError::AlreadyExists(_) | DomainError::TeamExists(_) => {
                ErrorCategory::ClientError
            }
            DomainError::PrMerged(_) | DomainError::NotAssigned(_) | DomainError::NoCandidate(_) => {
                ErrorCategory::Conflict
            }
            DomainError::Database(_) | DomainError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// True for storage/connectivity failures outside the domain taxonomy
    pub fn is_unclassified(&self) -> bool {
        self.category() == ErrorCategory::Internal
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// Configuration errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Domain(e) if e.is_unclassified() => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    e.code(),
                    "internal server error".to_string(),
                )
            }
            AppError::Domain(e) => (e.category().status_code(), e.code(), e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = Json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_codes_are_stable() {
        assert_eq!(DomainError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(DomainError::AlreadyExists("x".into()).code(), "PR_EXISTS");
        assert_eq!(DomainError::TeamExists("x".into()).code(), "TEAM_EXISTS");
        assert_eq!(DomainError::NoTeam("x".into()).code(), "NO_TEAM");
        assert_eq!(DomainError::PrMerged("x".into()).code(), "PR_MERGED");
        assert_eq!(DomainError::NotAssigned("x".into()).code(), "NOT_ASSIGNED");
        assert_eq!(DomainError::NoCandidate("x".into()).code(), "NO_CANDIDATE");
        assert_eq!(DomainError::Database("x".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn domain_error_categories() {
        assert_eq!(
            DomainError::NoTeam("u1".into()).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            DomainError::AlreadyExists("pr-1".into()).category(),
            ErrorCategory::ClientError
        );
        assert_eq!(
            DomainError::NoCandidate("pr-1".into()).category(),
            ErrorCategory::Conflict
        );
        assert!(DomainError::Database("down".into()).is_unclassified());
        assert!(!DomainError::PrMerged("pr-1".into()).is_unclassified());
    }

    #[test]
    fn app_error_status_follows_category() {
        let resp = AppError::from(DomainError::PrMerged("pr-1".into())).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = AppError::from(DomainError::NotFound("pr-1".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::from(DomainError::Internal("boom".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = AppError::BadRequest("missing".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
