//! SeaORM entities
//!
//! Row models mirroring `migrations/0001_init.sql`. Conversions into
//! domain entities live in the Postgres adapters.

pub mod pull_request_reviewers;
pub mod pull_requests;
pub mod teams;
pub mod users;
