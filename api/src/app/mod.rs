//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services run mutations inside a unit of work and publish the resulting
//! domain event only after the transaction has committed.

pub mod pull_request_service;
pub mod stats_service;
pub mod team_service;
pub mod user_service;

pub use pull_request_service::{PullRequestService, Reassignment, DEFAULT_REVIEWERS_PER_PR};
pub use stats_service::StatsService;
pub use team_service::TeamService;
pub use user_service::UserService;
