//! PostgreSQL implementation of LedgerStore.
//!
//! Every mutation runs in one transaction. The project row is read without a
//! lock, the change is prepared with the domain types, and the row is written
//! back with `WHERE id = $1 AND version = $n`. Zero affected rows means
//! another writer got there first; the transaction is rolled back and the
//! attempt reported as a conflict for the retry loop.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::adapters::retry::{retry_on_conflict, version_conflict, RetryPolicy};
use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, Money, PaymentId, ProjectId, Timestamp, UserId,
};
use crate::domain::ledger::{
    Member, NewMember, NewPayment, Payment, Project, ProjectName, ProjectStatus,
};
use crate::ports::{LedgerSnapshot, LedgerStore, ProjectPage};

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of the LedgerStore port.
pub struct PostgresLedgerStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_retry_policy(pool, RetryPolicy::default())
    }

    pub fn with_retry_policy(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    status: String,
    owner_member_id: String,
    total_amount: i64,
    member_count: i32,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DomainError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: ProjectId::from_uuid(row.id),
            name: ProjectName::new(&row.name).map_err(corrupt_row)?,
            status: row.status.parse::<ProjectStatus>().map_err(corrupt_row)?,
            owner_member_id: MemberId::new(row.owner_member_id).map_err(corrupt_row)?,
            total_amount: Money::from_minor(row.total_amount),
            member_count: u32::try_from(row.member_count).map_err(corrupt_row)?,
            version: row.version,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    project_id: Uuid,
    id: String,
    display_name: String,
    external_user_id: Option<String>,
    is_guest: bool,
    added_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member {
            id: MemberId::new(row.id).map_err(corrupt_row)?,
            project_id: ProjectId::from_uuid(row.project_id),
            display_name: row.display_name,
            external_user_id: row
                .external_user_id
                .map(UserId::new)
                .transpose()
                .map_err(corrupt_row)?,
            is_guest: row.is_guest,
            added_at: Timestamp::from_datetime(row.added_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    project_id: Uuid,
    payer_member_id: String,
    amount: i64,
    description: Option<String>,
    participants: Option<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let participants = row
            .participants
            .map(|ids| ids.into_iter().map(MemberId::new).collect::<Result<Vec<_>, _>>())
            .transpose()
            .map_err(corrupt_row)?;

        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            project_id: ProjectId::from_uuid(row.project_id),
            payer_member_id: MemberId::new(row.payer_member_id).map_err(corrupt_row)?,
            amount: Money::from_minor(row.amount),
            description: row.description,
            participants,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const PROJECT_COLUMNS: &str = "id, name, status, owner_member_id, total_amount, member_count, \
                               version, created_at, updated_at";

fn corrupt_row(e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored value: {}", e))
}

/// Maps sqlx errors, turning serialization failures into retryable conflicts.
fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.code().as_deref() {
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                return version_conflict(context);
            }
            _ => {}
        }
    }
    tracing::error!(error = %e, context, "Database error");
    DomainError::database(context, e)
}

fn project_not_found(id: &ProjectId) -> DomainError {
    DomainError::new(ErrorCode::ProjectNotFound, format!("Project not found: {}", id))
        .with_detail("id", id.to_string())
}

fn payment_not_found(id: &PaymentId) -> DomainError {
    DomainError::new(ErrorCode::PaymentNotFound, format!("Payment not found: {}", id))
        .with_detail("id", id.to_string())
}

async fn fetch_project(
    tx: &mut Transaction<'_, Postgres>,
    id: &ProjectId,
) -> Result<Project, DomainError> {
    let row: Option<ProjectRow> =
        sqlx::query_as(&format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to load project", e))?;
    row.ok_or_else(|| project_not_found(id))?.try_into()
}

/// Writes back a project mutated in memory, if nobody else has changed it.
async fn save_project_guarded(
    tx: &mut Transaction<'_, Postgres>,
    project: &Project,
    expected_version: i64,
    context: &str,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE projects SET
            status = $2,
            total_amount = $3,
            member_count = $4,
            version = $5,
            updated_at = $6
        WHERE id = $1 AND version = $7
        "#,
    )
    .bind(project.id.as_uuid())
    .bind(project.status.as_str())
    .bind(project.total_amount.minor_units())
    .bind(project.member_count as i32)
    .bind(project.version)
    .bind(project.updated_at.as_datetime())
    .bind(expected_version)
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error(context, e))?;

    if result.rows_affected() == 0 {
        return Err(version_conflict(context));
    }
    Ok(())
}

async fn insert_member(
    tx: &mut Transaction<'_, Postgres>,
    member: &Member,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO project_members (
            project_id, id, display_name, external_user_id, is_guest, added_at
        ) VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(member.project_id.as_uuid())
    .bind(member.id.as_str())
    .bind(&member.display_name)
    .bind(member.external_user_id.as_ref().map(|u| u.as_str()))
    .bind(member.is_guest)
    .bind(member.added_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return DomainError::validation(
                    "member_id",
                    format!("Member {} already exists in project", member.id),
                );
            }
        }
        db_error("Failed to insert member", e)
    })?;
    Ok(())
}

impl PostgresLedgerStore {
    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))
    }

    async fn try_add_member(
        &self,
        project_id: &ProjectId,
        new_member: NewMember,
    ) -> Result<Member, DomainError> {
        let mut tx = self.begin().await?;
        let mut project = fetch_project(&mut tx, project_id).await?;
        project.ensure_mutable()?;
        let expected = project.version;

        let member = new_member.into_member(*project_id);
        insert_member(&mut tx, &member).await?;
        project.record_member_added();
        save_project_guarded(&mut tx, &project, expected, "add_member").await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit member", e))?;
        Ok(member)
    }

    async fn try_add_payment(
        &self,
        project_id: &ProjectId,
        new_payment: NewPayment,
    ) -> Result<Payment, DomainError> {
        let mut tx = self.begin().await?;
        let mut project = fetch_project(&mut tx, project_id).await?;
        project.ensure_mutable()?;
        let expected = project.version;

        project.apply_total_delta(new_payment.amount)?;
        let payment = new_payment.into_payment(*project_id);
        let participants: Option<Vec<String>> = payment
            .participants
            .as_ref()
            .map(|ids| ids.iter().map(|m| m.as_str().to_string()).collect());

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, project_id, payer_member_id, amount, description, participants, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(project_id.as_uuid())
        .bind(payment.payer_member_id.as_str())
        .bind(payment.amount.minor_units())
        .bind(&payment.description)
        .bind(participants)
        .bind(payment.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert payment", e))?;

        save_project_guarded(&mut tx, &project, expected, "add_payment").await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit payment", e))?;
        Ok(payment)
    }

    async fn try_delete_payment(
        &self,
        project_id: &ProjectId,
        payment_id: &PaymentId,
    ) -> Result<Payment, DomainError> {
        let mut tx = self.begin().await?;
        let mut project = fetch_project(&mut tx, project_id).await?;
        project.ensure_mutable()?;
        let expected = project.version;

        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            DELETE FROM payments
            WHERE id = $1 AND project_id = $2
            RETURNING id, project_id, payer_member_id, amount, description, participants, created_at
            "#,
        )
        .bind(payment_id.as_uuid())
        .bind(project_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to delete payment", e))?;
        let payment: Payment = row.ok_or_else(|| payment_not_found(payment_id))?.try_into()?;

        project.apply_total_delta(-payment.amount)?;
        save_project_guarded(&mut tx, &project, expected, "delete_payment").await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit payment removal", e))?;
        Ok(payment)
    }

    async fn try_update_status(
        &self,
        project_id: &ProjectId,
        expected_status: ProjectStatus,
        new: ProjectStatus,
    ) -> Result<Project, DomainError> {
        let mut tx = self.begin().await?;
        let mut project = fetch_project(&mut tx, project_id).await?;
        let expected = project.version;

        if project.status != expected_status {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Project {} is {}, expected {}",
                    project_id, project.status, expected_status
                ),
            ));
        }
        project.transition_to(new)?;
        save_project_guarded(&mut tx, &project, expected, "update_status").await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit status change", e))?;
        Ok(project)
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn create_project(&self, owner: &NewMember, name: &str) -> Result<Project, DomainError> {
        let name = ProjectName::new(name)?;
        let project = Project::create(name, owner.id.clone());
        let owner_member = owner.clone().into_member(project.id);

        let mut tx = self.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, name, status, owner_member_id, total_amount, member_count,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(project.id.as_uuid())
        .bind(project.name.as_str())
        .bind(project.status.as_str())
        .bind(project.owner_member_id.as_str())
        .bind(project.total_amount.minor_units())
        .bind(project.member_count as i32)
        .bind(project.version)
        .bind(project.created_at.as_datetime())
        .bind(project.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert project", e))?;

        insert_member(&mut tx, &owner_member).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit project", e))?;
        Ok(project)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let row: Option<ProjectRow> =
            sqlx::query_as(&format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to load project", e))?;
        row.map(Project::try_from).transpose()
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
        if self.get_project(project_id).await?.is_none() {
            return Err(project_not_found(project_id));
        }
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT project_id, id, display_name, external_user_id, is_guest, added_at
            FROM project_members
            WHERE project_id = $1 AND id = $2
            "#,
        )
        .bind(project_id.as_uuid())
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load member", e))?;
        row.map(Member::try_from).transpose()
    }

    async fn list_members(&self, project_id: &ProjectId) -> Result<Vec<Member>, DomainError> {
        Ok(self
            .load_snapshot(project_id)
            .await?
            .ok_or_else(|| project_not_found(project_id))?
            .members)
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
        Ok(self
            .load_snapshot(project_id)
            .await?
            .ok_or_else(|| project_not_found(project_id))?
            .payments)
    }

    async fn load_snapshot(&self, project_id: &ProjectId) -> Result<Option<LedgerSnapshot>, DomainError> {
        let mut tx = self.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to open snapshot", e))?;

        let project = match fetch_project(&mut tx, project_id).await {
            Ok(project) => project,
            Err(e) if e.code == ErrorCode::ProjectNotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let members: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT project_id, id, display_name, external_user_id, is_guest, added_at
            FROM project_members
            WHERE project_id = $1
            ORDER BY added_at ASC, seq ASC
            "#,
        )
        .bind(project_id.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to list members", e))?;

        let payments: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, project_id, payer_member_id, amount, description, participants, created_at
            FROM payments
            WHERE project_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(project_id.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to list payments", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to close snapshot", e))?;

        Ok(Some(LedgerSnapshot {
            project,
            members: members
                .into_iter()
                .map(Member::try_from)
                .collect::<Result<_, _>>()?,
            payments: payments
                .into_iter()
                .map(Payment::try_from)
                .collect::<Result<_, _>>()?,
        }))
    }

    async fn list_projects_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
        cursor: Option<&ProjectId>,
    ) -> Result<ProjectPage, DomainError> {
        if let Some(cursor) = cursor {
            if self.get_project(cursor).await?.is_none() {
                return Err(DomainError::validation("cursor", "Unknown cursor"));
            }
        }

        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            r#"
            SELECT {cols} FROM projects p
            WHERE EXISTS (
                SELECT 1 FROM project_members m
                WHERE m.project_id = p.id AND m.external_user_id = $1
            )
            AND (
                $3::uuid IS NULL
                OR (p.updated_at, p.id) < (SELECT c.updated_at, c.id FROM projects c WHERE c.id = $3)
            )
            ORDER BY p.updated_at DESC, p.id DESC
            LIMIT $2
            "#,
            cols = "p.id, p.name, p.status, p.owner_member_id, p.total_amount, \
                    p.member_count, p.version, p.created_at, p.updated_at"
        ))
        .bind(user_id.as_str())
        .bind(i64::from(limit))
        .bind(cursor.map(|c| *c.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list projects", e))?;

        let projects: Vec<Project> = rows
            .into_iter()
            .map(Project::try_from)
            .collect::<Result<_, _>>()?;
        let next_cursor = if projects.len() == limit as usize {
            projects.last().map(|p| p.id)
        } else {
            None
        };

        Ok(ProjectPage {
            projects,
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
