//! Assignment statistics read models

use serde::Serialize;

use super::pull_request::PullRequestId;
use super::user::UserId;

/// Review load of a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAssignmentStat {
    pub user_id: UserId,
    pub assigned_total: i64,
    pub assigned_open: i64,
    pub assigned_merged: i64,
}

/// Reviewer count of a single pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrAssignmentStat {
    pub pull_request_id: PullRequestId,
    pub reviewer_count: i64,
}
