//! User handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::prs::PullRequestShortResponse;
use super::{invalid_json, require};
use crate::domain::entities::User;
use crate::domain::ports::{StatsRepository, UnitOfWork};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SetIsActiveRequest {
    #[serde(default)]
    pub user_id: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub team_name: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortResponse>,
}

/// POST /users/setIsActive
pub async fn set_is_active<U, S>(
    State(state): State<AppState<U, S>>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Json(request) = payload.map_err(invalid_json)?;
    require(&[("user_id", request.user_id.as_str())])?;
    let is_active = request
        .is_active
        .ok_or_else(|| AppError::BadRequest("is_active required".to_string()))?;

    let user = state
        .user_service
        .set_is_active(&request.user_id, is_active)
        .await?;

    Ok(Json(UserEnvelope { user: user.into() }))
}

/// GET /users/getReview?user_id=
pub async fn get_user_reviews<U, S>(
    State(state): State<AppState<U, S>>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> Result<Json<UserReviewsResponse>, AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.to_string()))?;
    require(&[("user_id", query.user_id.as_str())])?;

    let reviews = state.pr_service.get_user_reviews(&query.user_id).await?;

    Ok(Json(UserReviewsResponse {
        user_id: query.user_id,
        pull_requests: reviews.into_iter().map(Into::into).collect(),
    }))
}
