//! PostgreSQL unit of work
//!
//! Transactions are shared behind an `Arc` so every repository handed out
//! during a scope runs on the same connection. The last handle commits or
//! rolls back; a transaction dropped without either is rolled back by the
//! driver.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::{PostgresPullRequestRepository, PostgresTeamRepository, PostgresUserRepository};
use crate::domain::ports::{Repositories, Transaction, UnitOfWork};
use crate::error::DomainError;

/// Opens transactions on the pool; its own repositories read from the pool
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    db: DatabaseConnection,
}

impl PostgresUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repositories for PostgresUnitOfWork {
    type PullRequests = PostgresPullRequestRepository;
    type Users = PostgresUserRepository;
    type Teams = PostgresTeamRepository;

    fn pull_requests(&self) -> Self::PullRequests {
        PostgresPullRequestRepository::new(self.db.clone())
    }

    fn users(&self) -> Self::Users {
        PostgresUserRepository::new(self.db.clone())
    }

    fn teams(&self) -> Self::Teams {
        PostgresTeamRepository::new(self.db.clone())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Tx = PostgresTransaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(PostgresTransaction {
            txn: Arc::new(txn),
        })
    }
}

/// An open database transaction
#[derive(Clone)]
pub struct PostgresTransaction {
    txn: Arc<DatabaseTransaction>,
}

impl PostgresTransaction {
    fn into_inner(self) -> Result<DatabaseTransaction, DomainError> {
        Arc::try_unwrap(self.txn).map_err(|_| {
            DomainError::Internal("transaction still in use when finishing".to_string())
        })
    }
}

impl Repositories for PostgresTransaction {
    type PullRequests = PostgresPullRequestRepository<Arc<DatabaseTransaction>>;
    type Users = PostgresUserRepository<Arc<DatabaseTransaction>>;
    type Teams = PostgresTeamRepository<Arc<DatabaseTransaction>>;

    fn pull_requests(&self) -> Self::PullRequests {
        PostgresPullRequestRepository::new(self.txn.clone())
    }

    fn users(&self) -> Self::Users {
        PostgresUserRepository::new(self.txn.clone())
    }

    fn teams(&self) -> Self::Teams {
        PostgresTeamRepository::new(self.txn.clone())
    }
}

#[async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> Result<(), DomainError> {
        self.into_inner()?
            .commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn rollback(self) -> Result<(), DomainError> {
        self.into_inner()?
            .rollback()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}
