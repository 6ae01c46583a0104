//! Mock implementations of port traits
//!
//! In-memory implementations backed by one shared store. Transactions are
//! serialized by a store-wide lock and take a snapshot on begin, so a
//! rollback (or a forced commit failure) restores the exact prior state.
//!
//! The store-wide lock stands in for the per-row `FOR UPDATE` lock of the
//! Postgres adapter, and `lock_by_id` is a plain read. Timestamps come back
//! exactly as written, with no precision loss. Locking and storage
//! round-trips are covered by the `#[ignore]` tests in
//! `adapters::postgres::integration_tests`, not by these mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::OwnedMutexGuard;

use crate::domain::entities::{
    DomainEvent, NewPullRequest, PrAssignmentStat, PullRequest, PullRequestId, PullRequestShort,
    PullRequestStatus, Team, TeamMember, User, UserAssignmentStat, UserId,
};
use crate::domain::ports::{
    EventPublisher, PullRequestRepository, Repositories, StatsRepository, TeamRepository,
    Transaction, UnitOfWork, UserRepository,
};
use crate::domain::selection::Shuffle;
use crate::error::DomainError;

// ============================================================================
// Shared store
// ============================================================================

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    teams: BTreeSet<String>,
    prs: BTreeMap<PullRequestId, PullRequest>,
}

/// Shared state for every in-memory repository.
///
/// Not evidence of adapter behavior: see the module docs.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    tx_lock: Arc<tokio::sync::Mutex<()>>,
    fail_commit: AtomicBool,
}

impl InMemoryStore {
    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.read().unwrap())
    }

    fn write<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        f(&mut self.state.write().unwrap())
    }

    fn snapshot(&self) -> StoreState {
        self.read(|s| s.clone())
    }

    fn restore(&self, snapshot: StoreState) {
        self.write(|s| *s = snapshot);
    }
}

// ============================================================================
// In-Memory Unit of Work
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryUnitOfWork {
    store: Arc<InMemoryStore>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next commit roll back and fail with a database error
    pub fn fail_next_commit(&self) {
        self.store.fail_commit.store(true, Ordering::SeqCst);
    }

    /// Pre-populate users; their teams are created as needed
    pub fn seed_users(&self, users: Vec<User>) {
        self.store.write(|s| {
            for user in users {
                if let Some(team) = user.team() {
                    s.teams.insert(team.to_string());
                }
                s.users.insert(user.id.clone(), user);
            }
        });
    }

    pub fn seed_pull_request(&self, pr: PullRequest) {
        self.store.write(|s| {
            s.prs.insert(pr.id.clone(), pr);
        });
    }

    /// Current stored state of a pull request
    pub fn pull_request(&self, id: &str) -> Option<PullRequest> {
        self.store
            .read(|s| s.prs.get(&PullRequestId::from(id)).cloned())
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.store.read(|s| s.users.get(&UserId::from(id)).cloned())
    }

    pub fn stats(&self) -> InMemoryStatsRepository {
        InMemoryStatsRepository {
            store: self.store.clone(),
        }
    }
}

fn repositories_for(
    store: &Arc<InMemoryStore>,
) -> (
    InMemoryPullRequestRepository,
    InMemoryUserRepository,
    InMemoryTeamRepository,
) {
    (
        InMemoryPullRequestRepository {
            store: store.clone(),
        },
        InMemoryUserRepository {
            store: store.clone(),
        },
        InMemoryTeamRepository {
            store: store.clone(),
        },
    )
}

impl Repositories for InMemoryUnitOfWork {
    type PullRequests = InMemoryPullRequestRepository;
    type Users = InMemoryUserRepository;
    type Teams = InMemoryTeamRepository;

    fn pull_requests(&self) -> Self::PullRequests {
        repositories_for(&self.store).0
    }

    fn users(&self) -> Self::Users {
        repositories_for(&self.store).1
    }

    fn teams(&self) -> Self::Teams {
        repositories_for(&self.store).2
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let lock = self.store.tx_lock.clone().lock_owned().await;
        Ok(InMemoryTransaction {
            store: self.store.clone(),
            guard: Arc::new(TxGuard {
                snapshot: self.store.snapshot(),
                _lock: lock,
            }),
        })
    }
}

struct TxGuard {
    snapshot: StoreState,
    _lock: OwnedMutexGuard<()>,
}

#[derive(Clone)]
pub struct InMemoryTransaction {
    store: Arc<InMemoryStore>,
    guard: Arc<TxGuard>,
}

impl Repositories for InMemoryTransaction {
    type PullRequests = InMemoryPullRequestRepository;
    type Users = InMemoryUserRepository;
    type Teams = InMemoryTeamRepository;

    fn pull_requests(&self) -> Self::PullRequests {
        repositories_for(&self.store).0
    }

    fn users(&self) -> Self::Users {
        repositories_for(&self.store).1
    }

    fn teams(&self) -> Self::Teams {
        repositories_for(&self.store).2
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> Result<(), DomainError> {
        if self.store.fail_commit.swap(false, Ordering::SeqCst) {
            self.store.restore(self.guard.snapshot.clone());
            return Err(DomainError::Database("commit failed".to_string()));
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), DomainError> {
        self.store.restore(self.guard.snapshot.clone());
        Ok(())
    }
}

// ============================================================================
// In-Memory Pull Request Repository
// ============================================================================

pub struct InMemoryPullRequestRepository {
    store: Arc<InMemoryStore>,
}

fn missing_pr(id: &PullRequestId) -> DomainError {
    DomainError::NotFound(format!("pull request {} not found", id))
}

#[async_trait]
impl PullRequestRepository for InMemoryPullRequestRepository {
    async fn create_with_reviewers(
        &self,
        new: &NewPullRequest,
    ) -> Result<PullRequest, DomainError> {
        self.store.write(|s| {
            if s.prs.contains_key(&new.id) {
                return Err(DomainError::AlreadyExists(new.id.to_string()));
            }
            let pr = PullRequest {
                id: new.id.clone(),
                name: new.name.clone(),
                author_id: new.author_id.clone(),
                status: PullRequestStatus::Open,
                assigned_reviewers: new.reviewers.clone(),
                created_at: Utc::now(),
                merged_at: None,
            };
            s.prs.insert(pr.id.clone(), pr.clone());
            Ok(pr)
        })
    }

    async fn lock_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, DomainError> {
        Ok(self.store.read(|s| s.prs.get(id).cloned()))
    }

    async fn mark_merged(&self, id: &PullRequestId) -> Result<DateTime<Utc>, DomainError> {
        self.store.write(|s| {
            let pr = s.prs.get_mut(id).ok_or_else(|| missing_pr(id))?;
            let now = Utc::now();
            pr.status = PullRequestStatus::Merged;
            pr.merged_at = Some(now);
            Ok(now)
        })
    }

    async fn get_reviewers(&self, id: &PullRequestId) -> Result<Vec<UserId>, DomainError> {
        Ok(self.store.read(|s| {
            s.prs
                .get(id)
                .map(|pr| pr.assigned_reviewers.clone())
                .unwrap_or_default()
        }))
    }

    async fn set_reviewers(
        &self,
        id: &PullRequestId,
        reviewers: &[UserId],
    ) -> Result<(), DomainError> {
        self.store.write(|s| {
            let pr = s.prs.get_mut(id).ok_or_else(|| missing_pr(id))?;
            pr.assigned_reviewers = reviewers.to_vec();
            Ok(())
        })
    }

    async fn is_reviewer(
        &self,
        id: &PullRequestId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        Ok(self.store.read(|s| {
            s.prs
                .get(id)
                .map(|pr| pr.has_reviewer(user_id))
                .unwrap_or(false)
        }))
    }

    async fn find_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, DomainError> {
        Ok(self.store.read(|s| {
            s.prs
                .values()
                .filter(|pr| pr.has_reviewer(user_id))
                .map(PullRequest::short)
                .collect()
        }))
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.store.read(|s| s.users.get(id).cloned()))
    }

    async fn find_active_in_team_except(
        &self,
        team: &str,
        exclude: &[UserId],
    ) -> Result<Vec<User>, DomainError> {
        Ok(self.store.read(|s| {
            s.users
                .values()
                .filter(|u| u.is_candidate_for(team) && !exclude.contains(&u.id))
                .cloned()
                .collect()
        }))
    }

    async fn upsert_in_team(&self, team: &str, users: &[User]) -> Result<(), DomainError> {
        self.store.write(|s| {
            for user in users {
                let mut user = user.clone();
                user.team_name = Some(team.to_string());
                s.users.insert(user.id.clone(), user);
            }
        });
        Ok(())
    }

    async fn set_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<User>, DomainError> {
        Ok(self.store.write(|s| {
            s.users.get_mut(id).map(|u| {
                u.is_active = is_active;
                u.clone()
            })
        }))
    }
}

// ============================================================================
// In-Memory Team Repository
// ============================================================================

pub struct InMemoryTeamRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.store.read(|s| s.teams.contains(name)))
    }

    async fn create(&self, name: &str) -> Result<(), DomainError> {
        self.store.write(|s| {
            if !s.teams.insert(name.to_string()) {
                return Err(DomainError::TeamExists(name.to_string()));
            }
            Ok(())
        })
    }

    async fn find_with_members(&self, name: &str) -> Result<Option<Team>, DomainError> {
        Ok(self.store.read(|s| {
            if !s.teams.contains(name) {
                return None;
            }
            let members = s
                .users
                .values()
                .filter(|u| u.team() == Some(name))
                .cloned()
                .map(TeamMember::from)
                .collect();
            Some(Team {
                name: name.to_string(),
                members,
            })
        }))
    }
}

// ============================================================================
// In-Memory Stats Repository
// ============================================================================

#[derive(Clone)]
pub struct InMemoryStatsRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn user_assignment_stats(
        &self,
        team: Option<&str>,
    ) -> Result<Vec<UserAssignmentStat>, DomainError> {
        Ok(self.store.read(|s| {
            s.users
                .values()
                .filter(|u| team.map_or(true, |t| u.team() == Some(t)))
                .map(|u| {
                    let reviewed: Vec<_> =
                        s.prs.values().filter(|pr| pr.has_reviewer(&u.id)).collect();
                    let merged = reviewed.iter().filter(|pr| pr.is_merged()).count() as i64;
                    UserAssignmentStat {
                        user_id: u.id.clone(),
                        assigned_total: reviewed.len() as i64,
                        assigned_open: reviewed.len() as i64 - merged,
                        assigned_merged: merged,
                    }
                })
                .collect()
        }))
    }

    async fn pr_assignment_stats(&self) -> Result<Vec<PrAssignmentStat>, DomainError> {
        Ok(self.store.read(|s| {
            s.prs
                .values()
                .map(|pr| PrAssignmentStat {
                    pull_request_id: pr.id.clone(),
                    reviewer_count: pr.assigned_reviewers.len() as i64,
                })
                .collect()
        }))
    }
}

// ============================================================================
// Recording Event Publisher
// ============================================================================

/// Keeps every published event in order
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ============================================================================
// Deterministic shuffles
// ============================================================================

/// Leaves candidates in repository order
pub struct NoShuffle;

impl Shuffle for NoShuffle {
    fn shuffle(&self, _ids: &mut [UserId]) {}
}

/// Reverses candidates
pub struct ReverseShuffle;

impl Shuffle for ReverseShuffle {
    fn shuffle(&self, ids: &mut [UserId]) {
        ids.reverse();
    }
}
