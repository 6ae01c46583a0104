//! User service

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{DomainEvent, User, UserId};
use crate::domain::ports::{within_tx, EventPublisher, Repositories, UnitOfWork, UserRepository};
use crate::error::DomainError;

/// Service for user activity flags
pub struct UserService<U>
where
    U: UnitOfWork,
{
    uow: Arc<U>,
    events: Arc<dyn EventPublisher>,
}

impl<U> UserService<U>
where
    U: UnitOfWork,
{
    pub fn new(uow: Arc<U>, events: Arc<dyn EventPublisher>) -> Self {
        Self { uow, events }
    }

    /// Flip a user's active flag. Inactive users are never picked as reviewers
    /// but keep their existing assignments.
    pub async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User, DomainError> {
        let id = UserId::from(user_id);

        let user = within_tx(self.uow.as_ref(), |tx| async move {
            tx.users()
                .set_active(&id, is_active)
                .await?
                .ok_or_else(|| DomainError::NotFound(format!("user {} not found", id)))
        })
        .await?;

        info!(user_id = %user.id, is_active, "user activity changed");

        self.events
            .publish(DomainEvent::UserActivityChanged {
                user_id: user.id.clone(),
                is_active,
            })
            .await;

        Ok(user)
    }
}
