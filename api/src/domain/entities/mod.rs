//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod event;
pub mod pull_request;
pub mod stats;
pub mod team;
pub mod user;

pub use event::DomainEvent;
pub use pull_request::{
    NewPullRequest, PullRequest, PullRequestId, PullRequestShort, PullRequestStatus,
};
pub use stats::{PrAssignmentStat, UserAssignmentStat};
pub use team::{Team, TeamMember};
pub use user::{User, UserId};
