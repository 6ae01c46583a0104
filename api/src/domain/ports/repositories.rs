//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//! Whether a call participates in a transaction depends on where the
//! repository came from: see [`super::unit_of_work`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    NewPullRequest, PrAssignmentStat, PullRequest, PullRequestId, PullRequestShort, Team, User,
    UserAssignmentStat, UserId,
};
use crate::error::DomainError;

/// Repository for PullRequest entities
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Insert a new OPEN pull request with its initial reviewers.
    /// Fails with `AlreadyExists` on id collision.
    async fn create_with_reviewers(&self, pr: &NewPullRequest)
        -> Result<PullRequest, DomainError>;

    /// Read a pull request (with reviewers) holding an exclusive row lock
    /// until the surrounding transaction ends
    async fn lock_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, DomainError>;

    /// Move to MERGED and stamp merged_at; returns the stamp
    async fn mark_merged(&self, id: &PullRequestId) -> Result<DateTime<Utc>, DomainError>;

    /// Current reviewers in stored order
    async fn get_reviewers(&self, id: &PullRequestId) -> Result<Vec<UserId>, DomainError>;

    /// Replace the full reviewer list
    async fn set_reviewers(
        &self,
        id: &PullRequestId,
        reviewers: &[UserId],
    ) -> Result<(), DomainError>;

    /// Check whether a user is currently assigned
    async fn is_reviewer(&self, id: &PullRequestId, user_id: &UserId)
        -> Result<bool, DomainError>;

    /// Pull requests a user reviews, ordered by id
    async fn find_by_reviewer(&self, user_id: &UserId)
        -> Result<Vec<PullRequestShort>, DomainError>;
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Active members of `team` whose ids are not in `exclude`, ordered by id
    async fn find_active_in_team_except(
        &self,
        team: &str,
        exclude: &[UserId],
    ) -> Result<Vec<User>, DomainError>;

    /// Insert or update users, placing all of them in `team`
    async fn upsert_in_team(&self, team: &str, users: &[User]) -> Result<(), DomainError>;

    /// Set the active flag; None if the user does not exist
    async fn set_active(&self, id: &UserId, is_active: bool)
        -> Result<Option<User>, DomainError>;
}

/// Repository for Team entities
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, DomainError>;

    async fn create(&self, name: &str) -> Result<(), DomainError>;

    /// Team with members ordered by user id
    async fn find_with_members(&self, name: &str) -> Result<Option<Team>, DomainError>;
}

/// Read-only assignment statistics
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Per-user review load, optionally restricted to one team
    async fn user_assignment_stats(
        &self,
        team: Option<&str>,
    ) -> Result<Vec<UserAssignmentStat>, DomainError>;

    /// Reviewer count per pull request
    async fn pr_assignment_stats(&self) -> Result<Vec<PrAssignmentStat>, DomainError>;
}
