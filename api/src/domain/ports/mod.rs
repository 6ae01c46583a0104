//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod events;
pub mod repositories;
pub mod unit_of_work;

pub use events::EventPublisher;
pub use repositories::{
    PullRequestRepository, StatsRepository, TeamRepository, UserRepository,
};
pub use unit_of_work::{within_tx, Repositories, Transaction, UnitOfWork};
