//! Assignment statistics service
//!
//! Read-only; queries run outside any transaction.

use std::sync::Arc;

use crate::domain::entities::{PrAssignmentStat, UserAssignmentStat};
use crate::domain::ports::StatsRepository;
use crate::error::DomainError;

pub struct StatsService<S>
where
    S: StatsRepository,
{
    stats: Arc<S>,
}

impl<S> StatsService<S>
where
    S: StatsRepository,
{
    pub fn new(stats: Arc<S>) -> Self {
        Self { stats }
    }

    /// Review load per user, optionally for one team only
    pub async fn user_stats(
        &self,
        team: Option<&str>,
    ) -> Result<Vec<UserAssignmentStat>, DomainError> {
        let team = team.filter(|t| !t.is_empty());
        self.stats.user_assignment_stats(team).await
    }

    /// Reviewer count per pull request
    pub async fn pr_stats(&self) -> Result<Vec<PrAssignmentStat>, DomainError> {
        self.stats.pr_assignment_stats().await
    }
}
