//! Fixed-size worker pool
//!
//! Workers are long-lived tasks that take jobs from one shared handoff
//! channel. `submit` waits until a worker has accepted the job, so at most
//! `workers` jobs are ever in flight and callers get backpressure instead
//! of an unbounded queue.
//!
//! Each job runs in its own spawned task under an advisory deadline: when
//! the deadline passes the job's [`TaskContext`] is cancelled, but the job
//! is not aborted. A panicking job is logged and the worker moves on.
//!
//! Shutdown cancels the pool token (new submissions become no-ops), closes
//! the channel and waits for in-flight jobs for at most one task timeout.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Default number of workers
pub const DEFAULT_WORKERS: usize = 4;

/// Default advisory deadline for one task
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    pub workers: usize,
    pub task_timeout: Duration,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }
}

/// Scope handed to every task
#[derive(Debug, Clone)]
pub struct TaskContext {
    cancel: CancellationToken,
    deadline: Instant,
}

impl TaskContext {
    /// True once the deadline has passed or the pool is shutting down
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the task should stop
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

type BoxedTask = Box<dyn FnOnce(TaskContext) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

struct Job {
    task: BoxedTask,
    accepted: oneshot::Sender<()>,
}

pub struct WorkerPool {
    config: WorkerPoolConfig,
    shutdown: CancellationToken,
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Start the pool. Must be called from within a tokio runtime.
    pub fn new(config: WorkerPoolConfig) -> Self {
        let worker_count = config.workers.max(1);
        let shutdown = CancellationToken::new();
        let (sender, receiver) = mpsc::channel::<Job>(1);
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let workers = (0..worker_count)
            .map(|index| {
                tokio::spawn(run_worker(
                    index,
                    receiver.clone(),
                    shutdown.clone(),
                    config.task_timeout,
                ))
            })
            .collect();

        info!(
            workers = worker_count,
            task_timeout_ms = config.task_timeout.as_millis() as u64,
            "worker pool started"
        );

        Self {
            config,
            shutdown,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        }
    }

    /// Hand a task to the next free worker.
    ///
    /// Waits until a worker accepts it. Once shutdown has begun the task is
    /// dropped without running.
    pub async fn submit<F, Fut>(&self, task: F)
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.shutdown.is_cancelled() {
            debug!("worker pool stopped, task dropped");
            return;
        }

        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(sender) = sender else {
            debug!("worker pool stopped, task dropped");
            return;
        };

        let (accepted, on_accept) = oneshot::channel();
        let job = Job {
            task: Box::new(move |ctx| Box::pin(task(ctx))),
            accepted,
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => {
                debug!("worker pool stopping, task dropped");
            }
            _ = async {
                if sender.send(job).await.is_ok() {
                    let _ = on_accept.await;
                }
            } => {}
        }
    }

    /// Stop accepting tasks and wait for in-flight ones.
    ///
    /// Waits at most one task timeout; workers still busy after that are
    /// left running detached. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let workers = std::mem::take(
            &mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if workers.is_empty() {
            return;
        }

        let drain = async {
            for handle in workers {
                if let Err(e) = handle.await {
                    warn!(error = %e, "worker exited abnormally");
                }
            }
        };

        match tokio::time::timeout(self.config.task_timeout, drain).await {
            Ok(()) => info!("worker pool stopped"),
            Err(_) => warn!(
                timeout_ms = self.config.task_timeout.as_millis() as u64,
                "worker pool drain timed out, abandoning in-flight tasks"
            ),
        }
    }
}

async fn run_worker(
    index: usize,
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>,
    shutdown: CancellationToken,
    task_timeout: Duration,
) {
    loop {
        let job = {
            let mut receiver = receiver.lock().await;
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                job = receiver.recv() => job,
            }
        };

        let Some(job) = job else {
            debug!(worker = index, "worker stopping");
            break;
        };

        let _ = job.accepted.send(());
        run_task(index, job.task, &shutdown, task_timeout).await;
    }
}

async fn run_task(
    index: usize,
    task: BoxedTask,
    shutdown: &CancellationToken,
    task_timeout: Duration,
) {
    let scope = shutdown.child_token();
    let ctx = TaskContext {
        cancel: scope.clone(),
        deadline: Instant::now() + task_timeout,
    };

    let mut handle = tokio::spawn(task(ctx));

    let result = tokio::select! {
        result = &mut handle => result,
        _ = tokio::time::sleep(task_timeout) => {
            warn!(worker = index, "task exceeded its deadline");
            scope.cancel();
            handle.await
        }
    };

    match result {
        Ok(()) => {}
        Err(e) if e.is_panic() => {
            error!(
                worker = index,
                panic = %panic_message(e.into_panic()),
                "task panicked"
            );
        }
        Err(e) => warn!(worker = index, error = %e, "task did not complete"),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
