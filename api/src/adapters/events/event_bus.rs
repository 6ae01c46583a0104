//! Event bus
//!
//! Turns each published domain event into a worker-pool task that hands
//! the event to a sink. Delivery failures stay inside the pool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::worker_pool::{WorkerPool, WorkerPoolConfig};
use crate::domain::entities::DomainEvent;
use crate::domain::ports::EventPublisher;

/// Final destination of a dispatched event
pub trait EventSink: Send + Sync + 'static {
    fn deliver(&self, event: &DomainEvent);
}

/// Writes each event as a structured log record
pub struct LogSink;

impl EventSink for LogSink {
    fn deliver(&self, event: &DomainEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => info!(
                event_type = event.event_type(),
                payload = %payload,
                "domain_event"
            ),
            Err(e) => warn!(
                event_type = event.event_type(),
                error = %e,
                "failed to serialize domain event"
            ),
        }
    }
}

/// EventPublisher that dispatches through a worker pool
pub struct AsyncEventBus<S: EventSink = LogSink> {
    pool: WorkerPool,
    sink: Arc<S>,
}

impl AsyncEventBus<LogSink> {
    pub fn new(config: WorkerPoolConfig) -> Self {
        Self::with_sink(config, Arc::new(LogSink))
    }
}

impl<S: EventSink> AsyncEventBus<S> {
    pub fn with_sink(config: WorkerPoolConfig, sink: Arc<S>) -> Self {
        Self {
            pool: WorkerPool::new(config),
            sink,
        }
    }

    /// Stop dispatching and drain in-flight deliveries
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }
}

#[async_trait]
impl<S: EventSink> EventPublisher for AsyncEventBus<S> {
    async fn publish(&self, event: DomainEvent) {
        let sink = self.sink.clone();
        self.pool
            .submit(move |_ctx| async move {
                sink.deliver(&event);
            })
            .await;
    }
}
