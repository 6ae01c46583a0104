//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;

use super::mocks::{
    InMemoryStatsRepository, InMemoryUnitOfWork, NoShuffle, RecordingEventPublisher,
};
use crate::app::DEFAULT_REVIEWERS_PER_PR;
use crate::domain::entities::{
    PullRequest, PullRequestId, PullRequestStatus, TeamMember, User, UserId,
};
use crate::{build_router, AppState};

/// Create a user placed in `team`
pub fn test_user(id: &str, team: &str, is_active: bool) -> User {
    User {
        id: UserId::from(id),
        username: format!("user-{}", id),
        team_name: Some(team.to_string()),
        is_active,
    }
}

/// Create a team member entry
pub fn test_member(id: &str, is_active: bool) -> TeamMember {
    TeamMember {
        user_id: UserId::from(id),
        username: format!("user-{}", id),
        is_active,
    }
}

/// Create an OPEN pull request with the given reviewers
pub fn test_pull_request(id: &str, author: &str, reviewers: &[&str]) -> PullRequest {
    PullRequest {
        id: PullRequestId::from(id),
        name: format!("Change {}", id),
        author_id: UserId::from(author),
        status: PullRequestStatus::Open,
        assigned_reviewers: reviewers.iter().map(|r| UserId::from(*r)).collect(),
        created_at: Utc::now(),
        merged_at: None,
    }
}

/// Application state over in-memory adapters with deterministic selection
pub fn test_state(
    uow: &InMemoryUnitOfWork,
) -> AppState<InMemoryUnitOfWork, InMemoryStatsRepository> {
    AppState::new(
        Arc::new(uow.clone()),
        Arc::new(uow.stats()),
        Arc::new(RecordingEventPublisher::new()),
        Arc::new(NoShuffle),
        DEFAULT_REVIEWERS_PER_PR,
    )
}

/// HTTP test server over [`test_state`]
pub fn test_server(uow: &InMemoryUnitOfWork) -> TestServer {
    TestServer::new(build_router(test_state(uow))).expect("Failed to build test server")
}
