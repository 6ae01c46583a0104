//! Team handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{invalid_json, require};
use crate::domain::entities::{Team, TeamMember, UserId};
use crate::domain::ports::{StatsRepository, UnitOfWork};
use crate::error::AppError;
use crate::AppState;

/// Team as sent and returned over HTTP
#[derive(Debug, Serialize, Deserialize)]
pub struct TeamBody {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberBody>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamMemberBody {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<Team> for TeamBody {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.name,
            members: team
                .members
                .into_iter()
                .map(|m| TeamMemberBody {
                    user_id: m.user_id.0,
                    username: m.username,
                    is_active: m.is_active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamEnvelope {
    pub team: TeamBody,
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    #[serde(default)]
    pub team_name: String,
}

/// POST /team/add
pub async fn add_team<U, S>(
    State(state): State<AppState<U, S>>,
    payload: Result<Json<TeamBody>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamEnvelope>), AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Json(request) = payload.map_err(invalid_json)?;
    require(&[("team_name", request.team_name.as_str())])?;
    if request.members.iter().any(|m| m.user_id.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "members[].user_id required".to_string(),
        ));
    }

    let members = request
        .members
        .into_iter()
        .map(|m| TeamMember {
            user_id: UserId(m.user_id),
            username: m.username,
            is_active: m.is_active,
        })
        .collect();

    let team = state
        .team_service
        .add_team(&request.team_name, members)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamEnvelope { team: team.into() }),
    ))
}

/// GET /team/get?team_name=
pub async fn get_team<U, S>(
    State(state): State<AppState<U, S>>,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<TeamBody>, AppError>
where
    U: UnitOfWork,
    S: StatsRepository + 'static,
{
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.to_string()))?;
    require(&[("team_name", query.team_name.as_str())])?;

    let team = state.team_service.get_team(&query.team_name).await?;

    Ok(Json(team.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::test_utils::{test_server, test_user, InMemoryUnitOfWork};

    #[tokio::test]
    async fn add_then_get_team() {
        let uow = InMemoryUnitOfWork::new();
        let server = test_server(&uow);

        let response = server
            .post("/team/add")
            .json(&json!({
                "team_name": "backend",
                "members": [
                    { "user_id": "u2", "username": "Bob", "is_active": true },
                    { "user_id": "u1", "username": "Alice", "is_active": false }
                ]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["team"]["team_name"], "backend");
        assert_eq!(body["team"]["members"][0]["user_id"], "u1");

        let response = server
            .get("/team/get")
            .add_query_param("team_name", "backend")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["members"].as_array().unwrap().len(), 2);
        assert_eq!(body["members"][1]["username"], "Bob");
    }

    #[tokio::test]
    async fn add_existing_team_is_team_exists() {
        let uow = InMemoryUnitOfWork::new();
        uow.seed_users(vec![test_user("u1", "backend", true)]);
        let server = test_server(&uow);

        let response = server
            .post("/team/add")
            .json(&json!({ "team_name": "backend", "members": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "TEAM_EXISTS");
    }

    #[tokio::test]
    async fn get_team_requires_name() {
        let server = test_server(&InMemoryUnitOfWork::new());

        let response = server.get("/team/get").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/team/get")
            .add_query_param("team_name", "ghost")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
