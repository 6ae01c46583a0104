//! PostgreSQL adapter for UserRepository

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::handle::DbHandle;
use crate::domain::entities::{User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository<H: DbHandle = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> PostgresUserRepository<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

/// Keep the last entry per user id, in first-seen order of the survivors.
///
/// One `INSERT ... ON CONFLICT DO UPDATE` cannot touch the same row twice.
fn last_entry_per_id(members: &[User]) -> Vec<&User> {
    let mut seen = HashSet::new();
    let mut unique: Vec<&User> = members
        .iter()
        .rev()
        .filter(|u| seen.insert(&u.id))
        .collect();
    unique.reverse();
    unique
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.user_id),
            username: model.username,
            team_name: model.team_name,
            is_active: model.is_active,
        }
    }
}

#[async_trait]
impl<H: DbHandle> UserRepository for PostgresUserRepository<H> {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0.clone())
            .one(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_active_in_team_except(
        &self,
        team: &str,
        exclude: &[UserId],
    ) -> Result<Vec<User>, DomainError> {
        let mut query = users::Entity::find()
            .filter(users::Column::TeamName.eq(team))
            .filter(users::Column::IsActive.eq(true));

        if !exclude.is_empty() {
            query = query.filter(
                users::Column::UserId.is_not_in(exclude.iter().map(|id| id.0.clone())),
            );
        }

        let results = query
            .order_by_asc(users::Column::UserId)
            .all(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn upsert_in_team(&self, team: &str, members: &[User]) -> Result<(), DomainError> {
        if members.is_empty() {
            return Ok(());
        }

        let rows = last_entry_per_id(members).into_iter().map(|u| users::ActiveModel {
            user_id: Set(u.id.0.clone()),
            username: Set(u.username.clone()),
            team_name: Set(Some(team.to_string())),
            is_active: Set(u.is_active),
        });

        users::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::column(users::Column::UserId)
                    .update_columns([
                        users::Column::Username,
                        users::Column::TeamName,
                        users::Column::IsActive,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn set_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<User>, DomainError> {
        let Some(existing) = users::Entity::find_by_id(id.0.clone())
            .one(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut model: users::ActiveModel = existing.into();
        model.is_active = Set(is_active);

        let updated = model
            .update(self.db.conn())
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(Some(updated.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, username: &str, is_active: bool) -> User {
        User {
            id: UserId::from(id),
            username: username.to_string(),
            team_name: None,
            is_active,
        }
    }

    #[test]
    fn duplicate_ids_keep_last_entry() {
        let members = vec![
            member("u1", "first", true),
            member("u2", "bob", true),
            member("u1", "second", false),
        ];

        let unique = last_entry_per_id(&members);

        let names: Vec<_> = unique.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "second"]);
        assert!(!unique[1].is_active);
    }
}
