//! Event publication port

use async_trait::async_trait;

use crate::domain::entities::DomainEvent;

/// Sink for domain events.
///
/// Publication is fire-and-forget: it may wait for a dispatcher to accept
/// the event but never reports delivery success or failure back.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent);
}
