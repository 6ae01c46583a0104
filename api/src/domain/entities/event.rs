//! Domain events
//!
//! One event is produced per successful mutation. Events are ephemeral:
//! they are handed to the event publisher after commit and never stored.

use serde::Serialize;

use super::pull_request::PullRequestId;
use super::user::UserId;

/// A domain event with a typed payload
///
/// Serializes to the payload only; the wire tag comes from [`DomainEvent::event_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    PrCreated {
        pr_id: PullRequestId,
        author_id: UserId,
    },
    PrMerged {
        pr_id: PullRequestId,
    },
    ReviewerReassigned {
        pr_id: PullRequestId,
        old_user: UserId,
        replaced_by: UserId,
    },
    TeamCreated {
        team_name: String,
        members: usize,
    },
    UserActivityChanged {
        user_id: UserId,
        is_active: bool,
    },
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::PrCreated { .. } => "pr.created",
            DomainEvent::PrMerged { .. } => "pr.merged",
            DomainEvent::ReviewerReassigned { .. } => "pr.reassign",
            DomainEvent::TeamCreated { .. } => "team.created",
            DomainEvent::UserActivityChanged { .. } => "user.set_active",
        }
    }
}
