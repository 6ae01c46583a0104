//! Pull request handlers
//!
//! Create, merge (idempotent) and reviewer reassignment.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{invalid_json, require};
use crate::domain::entities::{PullRequest, PullRequestShort, PullRequestStatus};
use crate::domain::ports::{StatsRepository, UnitOfWork};
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a pull request
#[derive(Debug, Deserialize)]
pub struct CreatePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub pull_request_name: String,
    #[serde(default)]
    pub author_id: String,
}

/// Request to merge a pull request
#[derive(Debug, Deserialize)]
pub struct MergePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
}

/// Request to replace one reviewer
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub old_user_id: String,
}

/// Full pull request view
#[derive(Debug, Serialize)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestResponse {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id.0,
            pull_request_name: pr.name,
            author_id: pr.author_id.0,
            status: pr.status,
            assigned_reviewers: pr.assigned_reviewers.into_iter().map(|r| r.0).collect(),
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

/// Listing view of a pull request
#[derive(Debug, Serialize)]
pub struct PullRequestShortResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
}

impl From<PullRequestShort> for PullRequestShortResponse {
    fn from(pr: PullRequestShort) -> Self {
        Self {
            pull_request_id: pr.id.0,
            pull_request_name: pr.name,
            author_id: pr.author_id.0,
            status: pr.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrEnvelope {
    pub pr: PullRequestResponse,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /pullRequest/create
pub async fn create_pr<U, S>(
    State(state): State<AppState<U, S>>,
    payload: Result<Json<CreatePrRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PrEnvelope>), AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Json(request) = payload.map_err(invalid_json)?;
    require(&[
        ("pull_request_id", request.pull_request_id.as_str()),
        ("pull_request_name", request.pull_request_name.as_str()),
        ("author_id", request.author_id.as_str()),
    ])?;

    let pr = state
        .pr_service
        .create(
            &request.pull_request_id,
            &request.pull_request_name,
            &request.author_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PrEnvelope { pr: pr.into() })))
}

/// POST /pullRequest/merge
pub async fn merge_pr<U, S>(
    State(state): State<AppState<U, S>>,
    payload: Result<Json<MergePrRequest>, JsonRejection>,
) -> Result<Json<PrEnvelope>, AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Json(request) = payload.map_err(invalid_json)?;
    require(&[("pull_request_id", request.pull_request_id.as_str())])?;

    let pr = state.pr_service.merge(&request.pull_request_id).await?;

    Ok(Json(PrEnvelope { pr: pr.into() }))
}

/// POST /pullRequest/reassign
pub async fn reassign_reviewer<U, S>(
    State(state): State<AppState<U, S>>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> Result<Json<ReassignResponse>, AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Json(request) = payload.map_err(invalid_json)?;
    require(&[
        ("pull_request_id", request.pull_request_id.as_str()),
        ("old_user_id", request.old_user_id.as_str()),
    ])?;

    let result = state
        .pr_service
        .reassign_reviewer(&request.pull_request_id, &request.old_user_id)
        .await?;

    Ok(Json(ReassignResponse {
        pr: result.pull_request.into(),
        replaced_by: result.replaced_by.0,
    }))
}
