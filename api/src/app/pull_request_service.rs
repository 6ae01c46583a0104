//! Pull request service
//!
//! Create / merge / reassign under a unit of work, plus the reviewer
//! listing read path.
//!
//! Mutations lock the pull request row for the length of their transaction,
//! so concurrent merges or reassignments of the same id are serialized by
//! the store while distinct ids proceed in parallel. Events are published
//! only after the transaction has committed.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{
    DomainEvent, NewPullRequest, PullRequest, PullRequestId, PullRequestShort, PullRequestStatus,
    User, UserId,
};
use crate::domain::ports::{
    within_tx, EventPublisher, PullRequestRepository, Repositories, UnitOfWork, UserRepository,
};
use crate::domain::selection::{select_random, Shuffle};
use crate::error::DomainError;

/// Reviewers assigned to a freshly created pull request
pub const DEFAULT_REVIEWERS_PER_PR: usize = 2;

/// Outcome of a successful reassignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub pull_request: PullRequest,
    pub replaced_by: UserId,
}

/// Service for managing pull requests and their reviewers
pub struct PullRequestService<U>
where
    U: UnitOfWork,
{
    uow: Arc<U>,
    events: Arc<dyn EventPublisher>,
    shuffle: Arc<dyn Shuffle>,
    reviewers_per_pr: usize,
}

impl<U> PullRequestService<U>
where
    U: UnitOfWork,
{
    pub fn new(uow: Arc<U>, events: Arc<dyn EventPublisher>, shuffle: Arc<dyn Shuffle>) -> Self {
        Self {
            uow,
            events,
            shuffle,
            reviewers_per_pr: DEFAULT_REVIEWERS_PER_PR,
        }
    }

    pub fn with_reviewers_per_pr(mut self, reviewers_per_pr: usize) -> Self {
        self.reviewers_per_pr = reviewers_per_pr;
        self
    }

    /// Create an OPEN pull request with up to `reviewers_per_pr` active
    /// teammates of the author as reviewers.
    ///
    /// An empty eligible pool is not an error: the pull request is created
    /// without reviewers.
    pub async fn create(
        &self,
        id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest, DomainError> {
        let id = PullRequestId::from(id);
        let name = name.to_string();
        let author_id = UserId::from(author_id);
        let shuffle = self.shuffle.clone();
        let max = self.reviewers_per_pr;

        let created = within_tx(self.uow.as_ref(), |tx| async move {
            let users = tx.users();
            let author = find_user(&users, &author_id).await?;
            let team = require_team(&author)?;

            let candidates = users
                .find_active_in_team_except(&team, std::slice::from_ref(&author.id))
                .await?
                .into_iter()
                .map(|u| u.id)
                .collect();
            let reviewers = select_random(candidates, max, shuffle.as_ref());

            tx.pull_requests()
                .create_with_reviewers(&NewPullRequest {
                    id,
                    name,
                    author_id: author.id,
                    reviewers,
                })
                .await
        })
        .await?;

        info!(
            pr_id = %created.id,
            reviewers = created.assigned_reviewers.len(),
            "pull request created"
        );

        self.events
            .publish(DomainEvent::PrCreated {
                pr_id: created.id.clone(),
                author_id: created.author_id.clone(),
            })
            .await;

        Ok(created)
    }

    /// Merge a pull request. Merging an already merged pull request returns
    /// it unchanged and emits no event.
    pub async fn merge(&self, id: &str) -> Result<PullRequest, DomainError> {
        let id = PullRequestId::from(id);

        let (merged, transitioned) = within_tx(self.uow.as_ref(), |tx| async move {
            let prs = tx.pull_requests();
            let mut current = lock_pull_request(&prs, &id).await?;

            if current.is_merged() {
                current.assigned_reviewers = prs.get_reviewers(&id).await?;
                return Ok((current, false));
            }

            let merged_at = prs.mark_merged(&id).await?;
            current.status = PullRequestStatus::Merged;
            current.merged_at = Some(merged_at);
            current.assigned_reviewers = prs.get_reviewers(&id).await?;
            Ok((current, true))
        })
        .await?;

        if transitioned {
            info!(pr_id = %merged.id, "pull request merged");
            self.events
                .publish(DomainEvent::PrMerged {
                    pr_id: merged.id.clone(),
                })
                .await;
        } else {
            debug!(pr_id = %merged.id, "merge repeated on merged pull request");
        }

        Ok(merged)
    }

    /// Replace `old_user_id` on an OPEN pull request with one randomly
    /// chosen active teammate of `old_user_id` who is neither the author
    /// nor already reviewing.
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_user_id: &str,
    ) -> Result<Reassignment, DomainError> {
        let pr_id = PullRequestId::from(pr_id);
        let old_user_id = UserId::from(old_user_id);
        let shuffle = self.shuffle.clone();

        let (reassignment, old_user_id) = within_tx(self.uow.as_ref(), |tx| async move {
            let prs = tx.pull_requests();
            let users = tx.users();

            let mut current = lock_pull_request(&prs, &pr_id).await?;
            if current.is_merged() {
                return Err(DomainError::PrMerged(format!(
                    "cannot reassign on merged pull request {}",
                    pr_id
                )));
            }

            let old_user = find_user(&users, &old_user_id).await?;
            let team = require_team(&old_user)?;

            if !prs.is_reviewer(&pr_id, &old_user.id).await? {
                return Err(DomainError::NotAssigned(format!(
                    "{} is not a reviewer of {}",
                    old_user.id, pr_id
                )));
            }

            let candidates: Vec<UserId> = users
                .find_active_in_team_except(&team, &current.excluded_from_review())
                .await?
                .into_iter()
                .map(|u| u.id)
                .collect();

            let replaced_by = select_random(candidates, 1, shuffle.as_ref())
                .pop()
                .ok_or_else(|| {
                    DomainError::NoCandidate(format!(
                        "no active replacement for {} in team {}",
                        old_user.id, team
                    ))
                })?;

            let reviewers = current.reviewers_with_substitution(&old_user.id, &replaced_by);
            prs.set_reviewers(&pr_id, &reviewers).await?;
            current.assigned_reviewers = reviewers;

            Ok((
                Reassignment {
                    pull_request: current,
                    replaced_by,
                },
                old_user.id,
            ))
        })
        .await?;

        info!(
            pr_id = %reassignment.pull_request.id,
            old_user = %old_user_id,
            replaced_by = %reassignment.replaced_by,
            "reviewer reassigned"
        );

        self.events
            .publish(DomainEvent::ReviewerReassigned {
                pr_id: reassignment.pull_request.id.clone(),
                old_user: old_user_id,
                replaced_by: reassignment.replaced_by.clone(),
            })
            .await;

        Ok(reassignment)
    }

    /// Pull requests the user reviews. Runs outside any transaction.
    pub async fn get_user_reviews(
        &self,
        user_id: &str,
    ) -> Result<Vec<PullRequestShort>, DomainError> {
        self.uow
            .pull_requests()
            .find_by_reviewer(&UserId::from(user_id))
            .await
    }
}

async fn find_user<R: UserRepository>(users: &R, id: &UserId) -> Result<User, DomainError> {
    users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("user {} not found", id)))
}

async fn lock_pull_request<R: PullRequestRepository>(
    prs: &R,
    id: &PullRequestId,
) -> Result<PullRequest, DomainError> {
    prs.lock_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("pull request {} not found", id)))
}

fn require_team(user: &User) -> Result<String, DomainError> {
    user.team()
        .map(str::to_string)
        .ok_or_else(|| DomainError::NoTeam(format!("user {} has no team", user.id)))
}
