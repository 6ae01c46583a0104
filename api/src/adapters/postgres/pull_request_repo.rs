//! PostgreSQL adapter for PullRequestRepository

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};

use super::handle::DbHandle;
use crate::domain::entities::{
    NewPullRequest, PullRequest, PullRequestId, PullRequestShort, PullRequestStatus, UserId,
};
use crate::domain::ports::PullRequestRepository;
use crate::entity::{pull_request_reviewers, pull_requests};
use crate::error::DomainError;

/// PostgreSQL implementation of PullRequestRepository
pub struct PostgresPullRequestRepository<H: DbHandle = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> PostgresPullRequestRepository<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }

    async fn insert_reviewers(
        &self,
        id: &PullRequestId,
        reviewers: &[UserId],
    ) -> Result<(), DomainError> {
        if reviewers.is_empty() {
            return Ok(());
        }

        let rows = reviewers
            .iter()
            .enumerate()
            .map(|(position, user_id)| pull_request_reviewers::ActiveModel {
                pull_request_id: Set(id.0.clone()),
                user_id: Set(user_id.0.clone()),
                position: Set(position as i32),
            });

        pull_request_reviewers::Entity::insert_many(rows)
            .exec_without_returning(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

fn to_short(model: pull_requests::Model) -> Result<PullRequestShort, DomainError> {
    Ok(PullRequestShort {
        status: parse_status(&model.status)?,
        id: PullRequestId(model.pull_request_id),
        name: model.pull_request_name,
        author_id: UserId(model.author_id),
    })
}

fn to_pull_request(
    model: pull_requests::Model,
    reviewers: Vec<UserId>,
) -> Result<PullRequest, DomainError> {
    Ok(PullRequest {
        status: parse_status(&model.status)?,
        id: PullRequestId(model.pull_request_id),
        name: model.pull_request_name,
        author_id: UserId(model.author_id),
        assigned_reviewers: reviewers,
        created_at: model.created_at.with_timezone(&Utc),
        merged_at: model.merged_at.map(|t| t.with_timezone(&Utc)),
    })
}

/// Current time at the precision `timestamptz` stores
fn db_now() -> DateTime<FixedOffset> {
    Utc::now().trunc_subsecs(6).fixed_offset()
}

fn parse_status(raw: &str) -> Result<PullRequestStatus, DomainError> {
    raw.parse().map_err(DomainError::Internal)
}

fn map_insert_error(e: DbErr, id: &PullRequestId) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::AlreadyExists(format!("pull request {} already exists", id))
        }
        _ => DomainError::Database(e.to_string()),
    }
}

#[async_trait]
impl<H: DbHandle> PullRequestRepository for PostgresPullRequestRepository<H> {
    async fn create_with_reviewers(
        &self,
        pr: &NewPullRequest,
    ) -> Result<PullRequest, DomainError> {
        let model = pull_requests::ActiveModel {
            pull_request_id: Set(pr.id.0.clone()),
            pull_request_name: Set(pr.name.clone()),
            author_id: Set(pr.author_id.0.clone()),
            status: Set(PullRequestStatus::Open.to_string()),
            created_at: Set(db_now()),
            merged_at: Set(None),
        };

        let inserted = model
            .insert(self.db.conn())
            .await
            .map_err(|e| map_insert_error(e, &pr.id))?;

        self.insert_reviewers(&pr.id, &pr.reviewers).await?;

        to_pull_request(inserted, pr.reviewers.clone())
    }

    async fn lock_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, DomainError> {
        let result = pull_requests::Entity::find_by_id(id.0.clone())
            .lock_exclusive()
            .one(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match result {
            Some(model) => {
                let reviewers = self.get_reviewers(id).await?;
                to_pull_request(model, reviewers).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn mark_merged(&self, id: &PullRequestId) -> Result<DateTime<Utc>, DomainError> {
        let updated = pull_requests::ActiveModel {
            pull_request_id: Set(id.0.clone()),
            status: Set(PullRequestStatus::Merged.to_string()),
            merged_at: Set(Some(db_now())),
            ..Default::default()
        }
        .update(self.db.conn())
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        // Report what was stored, not the in-process clock
        updated
            .merged_at
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| DomainError::Internal(format!("merged_at not stored for {}", id)))
    }

    async fn get_reviewers(&self, id: &PullRequestId) -> Result<Vec<UserId>, DomainError> {
        let rows = pull_request_reviewers::Entity::find()
            .filter(pull_request_reviewers::Column::PullRequestId.eq(id.0.clone()))
            .order_by_asc(pull_request_reviewers::Column::Position)
            .all(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| UserId(r.user_id)).collect())
    }

    async fn set_reviewers(
        &self,
        id: &PullRequestId,
        reviewers: &[UserId],
    ) -> Result<(), DomainError> {
        pull_request_reviewers::Entity::delete_many()
            .filter(pull_request_reviewers::Column::PullRequestId.eq(id.0.clone()))
            .exec(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        self.insert_reviewers(id, reviewers).await
    }

    async fn is_reviewer(
        &self,
        id: &PullRequestId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let result = pull_request_reviewers::Entity::find_by_id((id.0.clone(), user_id.0.clone()))
            .one(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.is_some())
    }

    async fn find_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, DomainError> {
        let pr_ids: Vec<String> = pull_request_reviewers::Entity::find()
            .filter(pull_request_reviewers::Column::UserId.eq(user_id.0.clone()))
            .all(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .into_iter()
            .map(|r| r.pull_request_id)
            .collect();

        if pr_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = pull_requests::Entity::find()
            .filter(pull_requests::Column::PullRequestId.is_in(pr_ids))
            .order_by_asc(pull_requests::Column::PullRequestId)
            .all(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(to_short).collect()
    }
}
