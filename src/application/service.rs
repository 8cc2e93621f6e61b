//! LedgerService - one entry point bundling every ledger handler.
//!
//! Built once at startup and shared by the HTTP router and the chat adapter.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, Money, ProjectId, UserId};
use crate::domain::ledger::{
    LedgerCommand, LedgerError, LedgerOutcome, Member, Payment, Project, SettlementReport,
};
use crate::ports::{LedgerStore, ProjectPage};

use super::handlers::{
    AddMemberCommand, AddMemberHandler, CreateProjectCommand, CreateProjectHandler,
    GetProjectHandler, GetProjectQuery, GetSettlementsHandler, GetSettlementsQuery,
    ListPaymentsHandler, ListPaymentsQuery, ListProjectsHandler, ListProjectsQuery, PageLimits,
    ProjectDetails, RecordPaymentCommand, RecordPaymentHandler, RemovePaymentCommand,
    RemovePaymentHandler, SettleProjectCommand, SettleProjectHandler,
};

/// Tunables the service needs beyond the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSettings {
    /// Balances within this many minor units of zero count as settled.
    pub settlement_tolerance: Money,
    pub page_limits: PageLimits,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            settlement_tolerance: Money::ZERO,
            page_limits: PageLimits::default(),
        }
    }
}

pub struct LedgerService {
    create_project: CreateProjectHandler,
    add_member: AddMemberHandler,
    record_payment: RecordPaymentHandler,
    remove_payment: RemovePaymentHandler,
    get_settlements: GetSettlementsHandler,
    get_project: GetProjectHandler,
    list_payments: ListPaymentsHandler,
    list_projects: ListProjectsHandler,
    settle_project: SettleProjectHandler,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>, settings: LedgerSettings) -> Self {
        Self {
            create_project: CreateProjectHandler::new(store.clone()),
            add_member: AddMemberHandler::new(store.clone()),
            record_payment: RecordPaymentHandler::new(store.clone()),
            remove_payment: RemovePaymentHandler::new(store.clone()),
            get_settlements: GetSettlementsHandler::new(store.clone(), settings.settlement_tolerance),
            get_project: GetProjectHandler::new(store.clone()),
            list_payments: ListPaymentsHandler::new(store.clone()),
            list_projects: ListProjectsHandler::new(store.clone(), settings.page_limits),
            settle_project: SettleProjectHandler::new(store),
        }
    }

    pub async fn create_project(
        &self,
        cmd: CreateProjectCommand,
        metadata: CommandMetadata,
    ) -> Result<Project, LedgerError> {
        self.create_project.handle(cmd, metadata).await
    }

    pub async fn add_member(
        &self,
        cmd: AddMemberCommand,
        metadata: CommandMetadata,
    ) -> Result<Member, LedgerError> {
        self.add_member.handle(cmd, metadata).await
    }

    pub async fn record_payment(
        &self,
        cmd: RecordPaymentCommand,
        metadata: CommandMetadata,
    ) -> Result<Payment, LedgerError> {
        self.record_payment.handle(cmd, metadata).await
    }

    pub async fn remove_payment(
        &self,
        cmd: RemovePaymentCommand,
        metadata: CommandMetadata,
    ) -> Result<Payment, LedgerError> {
        self.remove_payment.handle(cmd, metadata).await
    }

    pub async fn settle_project(
        &self,
        cmd: SettleProjectCommand,
        metadata: CommandMetadata,
    ) -> Result<Project, LedgerError> {
        self.settle_project.handle(cmd, metadata).await
    }

    pub async fn get_settlements(
        &self,
        project_id: ProjectId,
        caller: &UserId,
    ) -> Result<SettlementReport, LedgerError> {
        self.get_settlements
            .handle(GetSettlementsQuery {
                project_id,
                user_id: caller.clone(),
            })
            .await
    }

    pub async fn get_project(
        &self,
        project_id: ProjectId,
        caller: &UserId,
    ) -> Result<ProjectDetails, LedgerError> {
        self.get_project
            .handle(GetProjectQuery {
                project_id,
                user_id: caller.clone(),
            })
            .await
    }

    pub async fn list_payments(
        &self,
        project_id: ProjectId,
        caller: &UserId,
    ) -> Result<Vec<Payment>, LedgerError> {
        self.list_payments
            .handle(ListPaymentsQuery {
                project_id,
                user_id: caller.clone(),
            })
            .await
    }

    pub async fn list_projects(
        &self,
        caller: &UserId,
        limit: Option<u32>,
        cursor: Option<ProjectId>,
    ) -> Result<ProjectPage, LedgerError> {
        self.list_projects
            .handle(ListProjectsQuery {
                user_id: caller.clone(),
                limit,
                cursor,
            })
            .await
    }

    /// Runs a chat or postback command on behalf of `metadata.user_id`.
    pub async fn dispatch(
        &self,
        command: LedgerCommand,
        metadata: CommandMetadata,
    ) -> Result<LedgerOutcome, LedgerError> {
        let action = command.action();
        tracing::debug!(
            action,
            caller = %metadata.user_id,
            source = metadata.source().as_str(),
            "Dispatching ledger command"
        );

        let outcome = match command {
            LedgerCommand::CreateProject { name, display_name } => {
                let project = self
                    .create_project(CreateProjectCommand { name, display_name }, metadata)
                    .await?;
                LedgerOutcome::ProjectCreated { project }
            }
            LedgerCommand::AddMember {
                project_id,
                display_name,
                external_user_id,
            } => {
                let member = self
                    .add_member(
                        AddMemberCommand {
                            project_id,
                            display_name,
                            external_user_id,
                        },
                        metadata,
                    )
                    .await?;
                LedgerOutcome::MemberAdded { member }
            }
            LedgerCommand::RecordPayment {
                project_id,
                payer,
                amount,
                description,
                participants,
            } => {
                let payment = self
                    .record_payment(
                        RecordPaymentCommand {
                            project_id,
                            payer,
                            amount,
                            description,
                            participants,
                        },
                        metadata,
                    )
                    .await?;
                LedgerOutcome::PaymentRecorded { payment }
            }
            LedgerCommand::RemovePayment {
                project_id,
                payment_id,
            } => {
                let payment = self
                    .remove_payment(
                        RemovePaymentCommand {
                            project_id,
                            payment_id,
                        },
                        metadata,
                    )
                    .await?;
                LedgerOutcome::PaymentRemoved { payment }
            }
            LedgerCommand::ShowSettlements { project_id } => {
                let report = self.get_settlements(project_id, &metadata.user_id).await?;
                LedgerOutcome::Settlements { report }
            }
            LedgerCommand::SettleProject { project_id } => {
                let project = self
                    .settle_project(SettleProjectCommand { project_id }, metadata)
                    .await?;
                LedgerOutcome::ProjectSettled { project }
            }
        };
        Ok(outcome)
    }
}
