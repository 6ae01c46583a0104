//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod events;
pub mod postgres;
pub mod random;

pub use events::{AsyncEventBus, WorkerPoolConfig};
pub use postgres::{PostgresStatsRepository, PostgresUnitOfWork};
pub use random::{SeededShuffle, ThreadRngShuffle};
