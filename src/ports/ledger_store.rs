//! Ledger store port.
//!
//! Durable storage for projects, their members, and their payment logs.
//!
//! # Contract
//!
//! - Every mutation is atomic: a payment row and the project's cached
//!   `total_amount` change together or not at all.
//! - Mutations that touch the project row check its `version`. On a mismatch
//!   the implementation retries per its `RetryPolicy` and reports
//!   `ErrorCode::Conflict` once attempts run out, with nothing written.
//! - Reads observe committed data only.
//!
//! Authorization is not the store's concern. The application layer checks
//! membership and ownership before calling in.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId, PaymentId, ProjectId, UserId};
use crate::domain::ledger::{Member, NewMember, NewPayment, Payment, Project, ProjectStatus};

/// Everything needed to compute balances, read at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub project: Project,
    /// Ordered by join time.
    pub members: Vec<Member>,
    /// Ordered by creation time.
    pub payments: Vec<Payment>,
}

/// One page of a user's projects, most recently updated first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    /// Pass back as `cursor` to fetch the next page. `None` on the last page.
    pub next_cursor: Option<ProjectId>,
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Creates an active project and stores `owner` as its first member.
    async fn create_project(&self, owner: &NewMember, name: &str) -> Result<Project, DomainError>;

    /// Returns `None` if the project does not exist.
    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Adds a member and bumps `member_count`.
    ///
    /// # Errors
    ///
    /// - `ProjectNotFound` if the project does not exist
    /// - `ValidationFailed` if a member with the same id already exists
    /// - `ProjectSettled` if the project no longer accepts writes
    /// - `Conflict` if concurrent writers exhausted the retry budget
    async fn add_member(&self, project_id: &ProjectId, member: NewMember) -> Result<Member, DomainError>;

    async fn find_member(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<Option<Member>, DomainError>;

    /// Members in join order.
    async fn list_members(&self, project_id: &ProjectId) -> Result<Vec<Member>, DomainError>;

    /// Inserts a payment and adds its amount to the project total.
    ///
    /// # Errors
    ///
    /// - `ProjectNotFound` if the project does not exist
    /// - `ValidationFailed` if the amount is not positive
    /// - `ProjectSettled` if the project no longer accepts writes
    /// - `Conflict` if concurrent writers exhausted the retry budget
    async fn add_payment(&self, project_id: &ProjectId, payment: NewPayment) -> Result<Payment, DomainError>;

    /// Removes a payment, subtracts its amount from the total, and returns it.
    ///
    /// # Errors
    ///
    /// - `ProjectNotFound` / `PaymentNotFound`
    /// - `ProjectSettled` if the project no longer accepts writes
    /// - `Conflict` if concurrent writers exhausted the retry budget
    async fn delete_payment(
        &self,
        project_id: &ProjectId,
        payment_id: &PaymentId,
    ) -> Result<Payment, DomainError>;

    /// Payments in creation order.
    async fn list_payments(&self, project_id: &ProjectId) -> Result<Vec<Payment>, DomainError>;

    /// Reads project, members and payments from one consistent snapshot.
    async fn load_snapshot(&self, project_id: &ProjectId) -> Result<Option<LedgerSnapshot>, DomainError>;

    /// Projects the user is a linked member of, most recently updated first.
    ///
    /// `cursor` is the last project id of the previous page.
    async fn list_projects_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
        cursor: Option<&ProjectId>,
    ) -> Result<ProjectPage, DomainError>;

    /// Moves the project from `expected` to `new` status.
    ///
    /// # Errors
    ///
    /// - `ProjectNotFound` if the project does not exist
    /// - `InvalidStateTransition` if the current status is not `expected`
    async fn update_status(
        &self,
        project_id: &ProjectId,
        expected: ProjectStatus,
        new: ProjectStatus,
    ) -> Result<Project, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn LedgerStore) {}
    }

    #[test]
    fn ledger_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LedgerStore>();
    }
}
