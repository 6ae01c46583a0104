//! Assignment statistics handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{PrAssignmentStat, UserAssignmentStat};
use crate::domain::ports::{StatsRepository, UnitOfWork};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub scope: Option<String>,
    pub team_name: Option<String>,
}

/// Which aggregates to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatsScope {
    All,
    Users,
    PullRequests,
}

impl std::str::FromStr for StatsScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatsScope::All),
            "users" => Ok(StatsScope::Users),
            "prs" => Ok(StatsScope::PullRequests),
            other => Err(AppError::BadRequest(format!(
                "unknown scope '{}', expected all, users or prs",
                other
            ))),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct StatsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_user: Option<Vec<UserAssignmentStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_pr: Option<Vec<PrAssignmentStat>>,
}

/// GET /stats/assignments?scope=all|users|prs&team_name=
pub async fn get_assignment_stats<U, S>(
    State(state): State<AppState<U, S>>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<StatsResponse>, AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let scope: StatsScope = query.scope.as_deref().unwrap_or("all").parse()?;

    let mut response = StatsResponse::default();

    if matches!(scope, StatsScope::All | StatsScope::Users) {
        let stats = state
            .stats_service
            .user_stats(query.team_name.as_deref())
            .await?;
        response.per_user = Some(stats);
    }

    if matches!(scope, StatsScope::All | StatsScope::PullRequests) {
        response.per_pr = Some(state.stats_service.pr_stats().await?);
    }

    Ok(Json(response))
}
