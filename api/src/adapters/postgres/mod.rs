//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod handle;
pub mod pull_request_repo;
pub mod stats_repo;
pub mod team_repo;
pub mod unit_of_work;
pub mod user_repo;


pub use handle::DbHandle;
pub use pull_request_repo::PostgresPullRequestRepository;
pub use stats_repo::PostgresStatsRepository;
pub use team_repo::PostgresTeamRepository;
pub use unit_of_work::{PostgresTransaction, PostgresUnitOfWork};
pub use user_repo::PostgresUserRepository;
