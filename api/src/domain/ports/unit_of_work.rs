//! Unit of work port
//!
//! A unit of work hands out repositories. Repositories taken from the unit
//! of work itself run outside any transaction (read-committed reads);
//! repositories taken from a [`Transaction`] participate in it.

use std::future::Future;

use async_trait::async_trait;
use tracing::warn;

use super::repositories::{PullRequestRepository, TeamRepository, UserRepository};
use crate::error::DomainError;

/// A set of repositories bound to one connection scope
pub trait Repositories: Send + Sync {
    type PullRequests: PullRequestRepository;
    type Users: UserRepository;
    type Teams: TeamRepository;

    fn pull_requests(&self) -> Self::PullRequests;
    fn users(&self) -> Self::Users;
    fn teams(&self) -> Self::Teams;
}

/// An open transaction. Clones share the same underlying transaction.
#[async_trait]
pub trait Transaction: Repositories + Clone + 'static {
    async fn commit(self) -> Result<(), DomainError>;
    async fn rollback(self) -> Result<(), DomainError>;
}

/// Opens transactions
#[async_trait]
pub trait UnitOfWork: Repositories + 'static {
    type Tx: Transaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError>;
}

/// Run `f` atomically.
///
/// Commits iff `f` succeeds; otherwise rolls back and returns `f`'s error
/// unchanged. Scopes do not nest: every call opens a fresh transaction.
pub async fn within_tx<U, T, F, Fut>(uow: &U, f: F) -> Result<T, DomainError>
where
    U: UnitOfWork + ?Sized,
    F: FnOnce(U::Tx) -> Fut + Send,
    Fut: Future<Output = Result<T, DomainError>> + Send,
    T: Send,
{
    let tx = uow.begin().await?;

    // Bound to a local so the closure's handle is dropped before commit.
    let outcome = f(tx.clone()).await;

    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
