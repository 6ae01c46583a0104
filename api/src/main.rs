//! Reviewer API Server
//!
//! Assigns pull request reviewers from the author's active teammates, lets
//! them be reassigned, and records merges. Uses hexagonal (ports & adapters)
//! architecture for clean separation of concerns.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    AsyncEventBus, PostgresStatsRepository, PostgresUnitOfWork, SeededShuffle, ThreadRngShuffle,
};
use app::{PullRequestService, StatsService, TeamService, UserService};
use config::Config;
use domain::ports::{EventPublisher, StatsRepository, UnitOfWork};
use domain::selection::Shuffle;

/// Application state shared across all handlers
pub struct AppState<U: UnitOfWork, S: StatsRepository> {
    pub pr_service: Arc<PullRequestService<U>>,
    pub team_service: Arc<TeamService<U>>,
    pub user_service: Arc<UserService<U>>,
    pub stats_service: Arc<StatsService<S>>,
}

// Derive would require U: Clone and S: Clone
impl<U: UnitOfWork, S: StatsRepository> Clone for AppState<U, S> {
    fn clone(&self) -> Self {
        Self {
            pr_service: self.pr_service.clone(),
            team_service: self.team_service.clone(),
            user_service: self.user_service.clone(),
            stats_service: self.stats_service.clone(),
        }
    }
}

impl<U: UnitOfWork, S: StatsRepository> AppState<U, S> {
    pub fn new(
        uow: Arc<U>,
        stats: Arc<S>,
        events: Arc<dyn EventPublisher>,
        shuffle: Arc<dyn Shuffle>,
        reviewers_per_pr: usize,
    ) -> Self {
        Self {
            pr_service: Arc::new(
                PullRequestService::new(uow.clone(), events.clone(), shuffle)
                    .with_reviewers_per_pr(reviewers_per_pr),
            ),
            team_service: Arc::new(TeamService::new(uow.clone(), events.clone())),
            user_service: Arc::new(UserService::new(uow, events)),
            stats_service: Arc::new(StatsService::new(stats)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router over any unit of work and stats store
pub fn build_router<U, S>(state: AppState<U, S>) -> Router
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    Router::new()
        .route("/health", get(health))
        // Teams
        .route("/team/add", post(handlers::add_team::<U, S>))
        .route("/team/get", get(handlers::get_team::<U, S>))
        // Users
        .route("/users/setIsActive", post(handlers::set_is_active::<U, S>))
        .route("/users/getReview", get(handlers::get_user_reviews::<U, S>))
        // Pull requests
        .route("/pullRequest/create", post(handlers::create_pr::<U, S>))
        .route("/pullRequest/merge", post(handlers::merge_pr::<U, S>))
        .route(
            "/pullRequest/reassign",
            post(handlers::reassign_reviewer::<U, S>),
        )
        // Stats
        .route(
            "/stats/assignments",
            get(handlers::get_assignment_stats::<U, S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reviewer_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reviewer API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    // Create adapters
    let uow = Arc::new(PostgresUnitOfWork::new(db.clone()));
    let stats = Arc::new(PostgresStatsRepository::new(db));
    let event_bus = Arc::new(AsyncEventBus::new(config.worker_pool()));

    let shuffle: Arc<dyn Shuffle> = match config.shuffle_seed {
        Some(seed) => {
            tracing::warn!(seed, "Using seeded reviewer selection");
            Arc::new(SeededShuffle::new(seed))
        }
        None => Arc::new(ThreadRngShuffle),
    };

    let state = AppState::new(
        uow,
        stats,
        event_bus.clone(),
        shuffle,
        config.reviewers_per_pr,
    );

    let app = build_router(state);

    // Start server
    tracing::info!("Listening on {}", config.http_addr);
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain in-flight event deliveries
    event_bus.shutdown().await;
    tracing::info!("Reviewer API stopped");

    Ok(())
}
