//! PostgreSQL adapter for TeamRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use super::handle::DbHandle;
use crate::domain::entities::{Team, TeamMember, User};
use crate::domain::ports::TeamRepository;
use crate::entity::{teams, users};
use crate::error::DomainError;

/// PostgreSQL implementation of TeamRepository
pub struct PostgresTeamRepository<H: DbHandle = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> PostgresTeamRepository<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> TeamRepository for PostgresTeamRepository<H> {
    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        let result = teams::Entity::find_by_id(name.to_string())
            .one(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.is_some())
    }

    async fn create(&self, name: &str) -> Result<(), DomainError> {
        teams::ActiveModel {
            team_name: Set(name.to_string()),
        }
        .insert(self.db.conn())
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::TeamExists(format!("team {} already exists", name))
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        Ok(())
    }

    async fn find_with_members(&self, name: &str) -> Result<Option<Team>, DomainError> {
        if !self.exists(name).await? {
            return Ok(None);
        }

        let members = users::Entity::find()
            .filter(users::Column::TeamName.eq(name))
            .order_by_asc(users::Column::UserId)
            .all(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(Some(Team {
            name: name.to_string(),
            members: members
                .into_iter()
                .map(|m| TeamMember::from(User::from(m)))
                .collect(),
        }))
    }
}
