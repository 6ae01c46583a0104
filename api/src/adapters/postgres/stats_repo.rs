//! PostgreSQL adapter for StatsRepository
//!
//! Aggregates run as raw SQL against the pool, outside any transaction.

use async_trait::async_trait;
use sea_orm::{DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};

use crate::domain::entities::{PrAssignmentStat, PullRequestId, UserAssignmentStat, UserId};
use crate::domain::ports::StatsRepository;
use crate::error::DomainError;

const USER_STATS_SQL: &str = r#"
SELECT u.user_id,
       COUNT(r.pull_request_id) AS assigned_total,
       COUNT(r.pull_request_id) FILTER (WHERE p.status = 'OPEN') AS assigned_open,
       COUNT(r.pull_request_id) FILTER (WHERE p.status = 'MERGED') AS assigned_merged
FROM users u
LEFT JOIN pull_request_reviewers r ON r.user_id = u.user_id
LEFT JOIN pull_requests p ON p.pull_request_id = r.pull_request_id
WHERE $1::text IS NULL OR u.team_name = $1
GROUP BY u.user_id
ORDER BY u.user_id
"#;

const PR_STATS_SQL: &str = r#"
SELECT p.pull_request_id,
       COUNT(r.user_id) AS reviewer_count
FROM pull_requests p
LEFT JOIN pull_request_reviewers r ON r.pull_request_id = p.pull_request_id
GROUP BY p.pull_request_id
ORDER BY p.pull_request_id
"#;

#[derive(Debug, FromQueryResult)]
struct UserStatRow {
    user_id: String,
    assigned_total: i64,
    assigned_open: i64,
    assigned_merged: i64,
}

#[derive(Debug, FromQueryResult)]
struct PrStatRow {
    pull_request_id: String,
    reviewer_count: i64,
}

/// PostgreSQL implementation of StatsRepository
pub struct PostgresStatsRepository {
    db: DatabaseConnection,
}

impl PostgresStatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    async fn user_assignment_stats(
        &self,
        team: Option<&str>,
    ) -> Result<Vec<UserAssignmentStat>, DomainError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            USER_STATS_SQL,
            [team.map(str::to_string).into()],
        );

        let rows = UserStatRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| UserAssignmentStat {
                user_id: UserId(r.user_id),
                assigned_total: r.assigned_total,
                assigned_open: r.assigned_open,
                assigned_merged: r.assigned_merged,
            })
            .collect())
    }

    async fn pr_assignment_stats(&self) -> Result<Vec<PrAssignmentStat>, DomainError> {
        let stmt = Statement::from_string(DatabaseBackend::Postgres, PR_STATS_SQL);

        let rows = PrStatRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| PrAssignmentStat {
                pull_request_id: PullRequestId(r.pull_request_id),
                reviewer_count: r.reviewer_count,
            })
            .collect())
    }
}
