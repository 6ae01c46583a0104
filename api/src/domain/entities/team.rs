//! Team domain entity

use serde::Serialize;

use super::user::{User, UserId};

/// A member entry of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub username: String,
    pub is_active: bool,
}

impl TeamMember {
    /// The user record this member becomes once placed in `team`
    pub fn into_user(self, team: &str) -> User {
        User {
            id: self.user_id,
            username: self.username,
            team_name: Some(team.to_string()),
            is_active: self.is_active,
        }
    }
}

impl From<User> for TeamMember {
    fn from(user: User) -> Self {
        TeamMember {
            user_id: user.id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}

/// A named team with its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<TeamMember>,
}
