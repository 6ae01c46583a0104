//! User domain entity
//!
//! Users are owned by team management; the review core only reads them to
//! decide who may be assigned to a pull request.

use serde::{Deserialize, Serialize};

/// Unique identifier for a user (caller supplied)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team member as seen by the review core
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub team_name: Option<String>,
    pub is_active: bool,
}

impl User {
    /// Team membership, if any
    pub fn team(&self) -> Option<&str> {
        self.team_name.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether this user may be assigned to review for the given team
    pub fn is_candidate_for(&self, team: &str) -> bool {
        self.is_active && self.team() == Some(team)
    }
}
