//! Asynchronous event dispatch
//!
//! A fixed-size worker pool and the event bus built on top of it.

pub mod event_bus;
pub mod worker_pool;

pub use event_bus::{AsyncEventBus, EventSink, LogSink};
pub use worker_pool::{TaskContext, WorkerPool, WorkerPoolConfig};
