//! Pull request domain entity
//!
//! A pull request is created OPEN with up to N reviewers and moves to
//! MERGED exactly once. Reviewers can only be swapped while it is OPEN.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Unique identifier for a pull request (caller supplied, immutable)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PullRequestId(pub String);

impl From<String> for PullRequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PullRequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pull request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    /// Initial state; reviewers may be reassigned
    Open,
    /// Terminal state
    Merged,
}

impl std::fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PullRequestStatus::Open => write!(f, "OPEN"),
            PullRequestStatus::Merged => write!(f, "MERGED"),
        }
    }
}

impl std::str::FromStr for PullRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPEN" => Ok(PullRequestStatus::Open),
            "MERGED" => Ok(PullRequestStatus::Merged),
            _ => Err(format!("Unknown pull request status: {}", s)),
        }
    }
}

/// A pull request with its assigned reviewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub id: PullRequestId,
    pub name: String,
    pub author_id: UserId,
    pub status: PullRequestStatus,
    /// Order is not meaningful but is kept stable across substitutions
    pub assigned_reviewers: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    /// Set iff status is MERGED
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    pub fn has_reviewer(&self, user_id: &UserId) -> bool {
        self.assigned_reviewers.contains(user_id)
    }

    /// Ids that may never be picked as a new reviewer: the author and everyone already assigned
    pub fn excluded_from_review(&self) -> Vec<UserId> {
        let mut excluded = Vec::with_capacity(self.assigned_reviewers.len() + 1);
        excluded.push(self.author_id.clone());
        excluded.extend(self.assigned_reviewers.iter().cloned());
        excluded
    }

    /// Reviewer list with `old` swapped for `new` in place
    pub fn reviewers_with_substitution(&self, old: &UserId, new: &UserId) -> Vec<UserId> {
        self.assigned_reviewers
            .iter()
            .map(|r| if r == old { new.clone() } else { r.clone() })
            .collect()
    }

    pub fn short(&self) -> PullRequestShort {
        PullRequestShort {
            id: self.id.clone(),
            name: self.name.clone(),
            author_id: self.author_id.clone(),
            status: self.status,
        }
    }
}

/// Listing view of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestShort {
    pub id: PullRequestId,
    pub name: String,
    pub author_id: UserId,
    pub status: PullRequestStatus,
}

/// Data needed to create a new pull request
#[derive(Debug, Clone)]
pub struct NewPullRequest {
    pub id: PullRequestId,
    pub name: String,
    pub author_id: UserId,
    pub reviewers: Vec<UserId>,
}
