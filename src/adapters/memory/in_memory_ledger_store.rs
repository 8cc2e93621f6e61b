//! In-memory ledger store.
//!
//! Used by tests and by the binary when no database is configured. Writes go
//! through the same read-version / compare-and-commit protocol as the
//! Postgres adapter, so the conflict retry path is exercised for real.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::adapters::retry::{retry_on_conflict, version_conflict, RetryPolicy};
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, PaymentId, ProjectId, UserId};
use crate::domain::ledger::{
    Member, NewMember, NewPayment, Payment, Project, ProjectName, ProjectStatus,
};
use crate::ports::{LedgerSnapshot, LedgerStore, ProjectPage};

#[derive(Debug, Clone)]
struct ProjectRecord {
    project: Project,
    members: Vec<Member>,
    payments: Vec<Payment>,
}

/// In-memory `LedgerStore`.
#[derive(Debug, Clone)]
pub struct InMemoryLedgerStore {
    projects: Arc<RwLock<HashMap<ProjectId, ProjectRecord>>>,
    retry: RetryPolicy,
    injected_conflicts: Arc<AtomicU32>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::with_retry_policy(RetryPolicy::default())
    }

    pub fn with_retry_policy(retry: RetryPolicy) -> Self {
        Self {
            projects: Arc::new(RwLock::new(HashMap::new())),
            retry,
            injected_conflicts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Makes the next `count` commit attempts fail their version check.
    pub fn inject_conflicts(&self, count: u32) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    /// Number of stored projects.
    pub async fn project_count(&self) -> usize {
        self.projects.read().await.len()
    }

    fn take_injected_conflict(&self) -> bool {
        self.injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    async fn read_project(&self, project_id: &ProjectId) -> Result<ProjectRecord, DomainError> {
        self.projects
            .read()
            .await
            .get(project_id)
            .cloned()
            .ok_or_else(|| project_not_found(project_id))
    }

    /// Commits `apply` if the stored project still has `expected_version`.
    async fn commit<F>(
        &self,
        context: &str,
        project_id: &ProjectId,
        expected_version: i64,
        apply: F,
    ) -> Result<(), DomainError>
    where
        F: FnOnce(&mut ProjectRecord),
    {
        let mut projects = self.projects.write().await;
        let record = projects
            .get_mut(project_id)
            .ok_or_else(|| project_not_found(project_id))?;
        if self.take_injected_conflict() || record.project.version != expected_version {
            return Err(version_conflict(context));
        }
        apply(record);
        Ok(())
    }

    async fn try_add_member(
        &self,
        project_id: &ProjectId,
        new_member: NewMember,
    ) -> Result<Member, DomainError> {
        let record = self.read_project(project_id).await?;
        record.project.ensure_mutable()?;
        if record.members.iter().any(|m| m.id == new_member.id) {
            return Err(DomainError::validation(
                "member_id",
                format!("Member {} already exists in project", new_member.id),
            ));
        }

        let mut project = record.project.clone();
        project.record_member_added();
        let member = new_member.into_member(*project_id);

        let stored = member.clone();
        self.commit("add_member", project_id, record.project.version, move |r| {
            r.project = project;
            r.members.push(stored);
        })
        .await?;
        Ok(member)
    }

    async fn try_add_payment(
        &self,
        project_id: &ProjectId,
        new_payment: NewPayment,
    ) -> Result<Payment, DomainError> {
        let record = self.read_project(project_id).await?;
        record.project.ensure_mutable()?;

        let mut project = record.project.clone();
        project.apply_total_delta(new_payment.amount)?;
        let payment = new_payment.into_payment(*project_id);

        let stored = payment.clone();
        self.commit("add_payment", project_id, record.project.version, move |r| {
            r.project = project;
            r.payments.push(stored);
        })
        .await?;
        Ok(payment)
    }

    async fn try_delete_payment(
        &self,
        project_id: &ProjectId,
        payment_id: &PaymentId,
    ) -> Result<Payment, DomainError> {
        let record = self.read_project(project_id).await?;
        record.project.ensure_mutable()?;
        let payment = record
            .payments
            .iter()
            .find(|p| p.id == *payment_id)
            .cloned()
            .ok_or_else(|| payment_not_found(payment_id))?;

        let mut project = record.project.clone();
        project.apply_total_delta(-payment.amount)?;

        let removed = payment.id;
        self.commit("delete_payment", project_id, record.project.version, move |r| {
            r.project = project;
            r.payments.retain(|p| p.id != removed);
        })
        .await?;
        Ok(payment)
    }

    async fn try_update_status(
        &self,
        project_id: &ProjectId,
        expected: ProjectStatus,
        new: ProjectStatus,
    ) -> Result<Project, DomainError> {
        let record = self.read_project(project_id).await?;
        if record.project.status != expected {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Project {} is {}, expected {}",
                    project_id, record.project.status, expected
                ),
            ));
        }

        let mut project = record.project.clone();
        project.transition_to(new)?;

        let updated = project.clone();
        self.commit("update_status", project_id, record.project.version, move |r| {
            r.project = updated;
        })
        .await?;
        Ok(project)
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create_project(&self, owner: &NewMember, name: &str) -> Result<Project, DomainError> {
        let name = ProjectName::new(name)?;
        let project = Project::create(name, owner.id.clone());
        let owner_member = owner.clone().into_member(project.id);

        self.projects.write().await.insert(
            project.id,
            ProjectRecord {
                project: project.clone(),
                members: vec![owner_member],
                payments: Vec::new(),
            },
        );
        Ok(project)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.projects.read().await.get(id).map(|r| r.project.clone()))
    }

    async fn add_member(&self, project_id: &ProjectId, member: NewMember) -> Result<Member, DomainError> {
        retry_on_conflict(&self.retry, "add_member", move || {
            self.try_add_member(project_id, member.clone())
        })
        .await
    }

    async fn find_member(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<Option<Member>, DomainError> {
        let projects = self.projects.read().await;
        let record = projects
            .get(project_id)
            .ok_or_else(|| project_not_found(project_id))?;
        Ok(record.members.iter().find(|m| m.id == *member_id).cloned())
    }

    async fn list_members(&self, project_id: &ProjectId) -> Result<Vec<Member>, DomainError> {
        Ok(self.read_project(project_id).await?.members)
    }

    async fn add_payment(&self, project_id: &ProjectId, payment: NewPayment) -> Result<Payment, DomainError> {
        if !payment.amount.is_positive() {
            return Err(DomainError::validation("amount", "Amount must be positive"));
        }
        retry_on_conflict(&self.retry, "add_payment", move || {
            self.try_add_payment(project_id, payment.clone())
        })
        .await
    }

    async fn delete_payment(
        &self,
        project_id: &ProjectId,
        payment_id: &PaymentId,
    ) -> Result<Payment, DomainError> {
        retry_on_conflict(&self.retry, "delete_payment", move || {
            self.try_delete_payment(project_id, payment_id)
        })
        .await
    }

    async fn list_payments(&self, project_id: &ProjectId) -> Result<Vec<Payment>, DomainError> {
        Ok(self.read_project(project_id).await?.payments)
    }

    async fn load_snapshot(&self, project_id: &ProjectId) -> Result<Option<LedgerSnapshot>, DomainError> {
        // One read guard covers all three lists.
        let projects = self.projects.read().await;
        Ok(projects.get(project_id).map(|r| LedgerSnapshot {
            project: r.project.clone(),
            members: r.members.clone(),
            payments: r.payments.clone(),
        }))
    }

    async fn list_projects_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
        cursor: Option<&ProjectId>,
    ) -> Result<ProjectPage, DomainError> {
        let projects = self.projects.read().await;
        let mut mine: Vec<&Project> = projects
            .values()
            .filter(|r| r.members.iter().any(|m| m.is_user(user_id)))
            .map(|r| &r.project)
            .collect();
        mine.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));

        let start = match cursor {
            Some(cursor) => {
                let anchor = projects
                    .get(cursor)
                    .map(|r| &r.project)
                    .ok_or_else(|| DomainError::validation("cursor", "Unknown cursor"))?;
                mine.iter()
                    .position(|p| (p.updated_at, p.id) < (anchor.updated_at, anchor.id))
                    .unwrap_or(mine.len())
            }
            None => 0,
        };

        let page: Vec<Project> = mine
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        let next_cursor = if page.len() == limit as usize {
            page.last().map(|p| p.id)
        } else {
            None
        };

        Ok(ProjectPage {
            projects: page,
            next_cursor,
        })
    }

    async fn update_status(
        &self,
        project_id: &ProjectId,
        expected: ProjectStatus,
        new: ProjectStatus,
    ) -> Result<Project, DomainError> {
        retry_on_conflict(&self.retry, "update_status", move || {
            self.try_update_status(project_id, expected, new)
        })
        .await
    }
}

fn project_not_found(id: &ProjectId) -> DomainError {
    DomainError::new(ErrorCode::ProjectNotFound, format!("Project not found: {}", id))
        .with_detail("id", id.to_string())
}

fn payment_not_found(id: &PaymentId) -> DomainError {
    DomainError::new(ErrorCode::PaymentNotFound, format!("Payment not found: {}", id))
        .with_detail("id", id.to_string())
}
