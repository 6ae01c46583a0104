//! HTTP handlers
//!
//! Axum request handlers for the API endpoints. Each handler validates its
//! input, makes exactly one service call and shapes the response.

pub mod prs;
pub mod stats;
pub mod teams;
pub mod users;

pub use prs::{create_pr, merge_pr, reassign_reviewer};
pub use stats::get_assignment_stats;
pub use teams::{add_team, get_team};
pub use users::{get_user_reviews, set_is_active};

use crate::error::AppError;

/// Rejection message for bodies that do not parse
pub(crate) fn invalid_json<E: std::fmt::Display>(e: E) -> AppError {
    tracing::debug!(error = %e, "rejected request body");
    AppError::BadRequest("invalid JSON".to_string())
}

/// Error for empty or missing required fields
pub(crate) fn require(fields: &[(&str, &str)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "{} required",
            missing.join(", ")
        )))
    }
}
