//! Connection handles
//!
//! Repositories are generic over where their queries run: the shared pool
//! for plain reads, or an open transaction for unit-of-work scopes.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};

/// A cheaply clonable handle to something queries can run against
pub trait DbHandle: Clone + Send + Sync + 'static {
    type Conn: ConnectionTrait;

    fn conn(&self) -> &Self::Conn;
}

impl DbHandle for DatabaseConnection {
    type Conn = DatabaseConnection;

    fn conn(&self) -> &Self::Conn {
        self
    }
}

impl DbHandle for Arc<DatabaseTransaction> {
    type Conn = DatabaseTransaction;

    fn conn(&self) -> &Self::Conn {
        self.as_ref()
    }
}
