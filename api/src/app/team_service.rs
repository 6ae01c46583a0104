//! Team service
//!
//! Creates teams together with their members and reads them back.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{DomainEvent, Team, TeamMember, User};
use crate::domain::ports::{
    within_tx, EventPublisher, Repositories, TeamRepository, UnitOfWork, UserRepository,
};
use crate::error::DomainError;

/// Service for managing teams
pub struct TeamService<U>
where
    U: UnitOfWork,
{
    uow: Arc<U>,
    events: Arc<dyn EventPublisher>,
}

impl<U> TeamService<U>
where
    U: UnitOfWork,
{
    pub fn new(uow: Arc<U>, events: Arc<dyn EventPublisher>) -> Self {
        Self { uow, events }
    }

    /// Create a team and place every member in it.
    ///
    /// Members that already belong to another team are moved.
    pub async fn add_team(
        &self,
        name: &str,
        members: Vec<TeamMember>,
    ) -> Result<Team, DomainError> {
        let team_name = name.to_string();
        let users: Vec<User> = members.into_iter().map(|m| m.into_user(name)).collect();

        let team = within_tx(self.uow.as_ref(), |tx| async move {
            let teams = tx.teams();
            if teams.exists(&team_name).await? {
                return Err(DomainError::TeamExists(format!(
                    "team {} already exists",
                    team_name
                )));
            }

            teams.create(&team_name).await?;
            tx.users().upsert_in_team(&team_name, &users).await?;

            teams
                .find_with_members(&team_name)
                .await?
                .ok_or_else(|| DomainError::Internal(format!("team {} vanished", team_name)))
        })
        .await?;

        info!(team = %team.name, members = team.members.len(), "team created");

        self.events
            .publish(DomainEvent::TeamCreated {
                team_name: team.name.clone(),
                members: team.members.len(),
            })
            .await;

        Ok(team)
    }

    /// Team with members ordered by user id. Reads outside a transaction.
    pub async fn get_team(&self, name: &str) -> Result<Team, DomainError> {
        self.uow
            .teams()
            .find_with_members(name)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("team {} not found", name)))
    }
}
