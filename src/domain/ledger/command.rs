//! Chat and postback command payloads.
//!
//! Text parsing happens upstream. By the time a command reaches the ledger it
//! is one of these variants, each carrying only the fields it needs.

use serde::{Deserialize, Serialize};

use super::member::Member;
use super::payment::Payment;
use super::project::Project;
use super::report::SettlementReport;
use crate::domain::foundation::{MemberId, Money, PaymentId, ProjectId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LedgerCommand {
    CreateProject {
        name: String,
        #[serde(default)]
        display_name: Option<String>,
    },
    AddMember {
        project_id: ProjectId,
        display_name: String,
        #[serde(default)]
        external_user_id: Option<UserId>,
    },
    RecordPayment {
        project_id: ProjectId,
        payer: MemberId,
        amount: Money,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        participants: Option<Vec<MemberId>>,
    },
    RemovePayment {
        project_id: ProjectId,
        payment_id: PaymentId,
    },
    ShowSettlements {
        project_id: ProjectId,
    },
    SettleProject {
        project_id: ProjectId,
    },
}

impl LedgerCommand {
    /// Stable name used in logs.
    pub fn action(&self) -> &'static str {
        match self {
            LedgerCommand::CreateProject { .. } => "create_project",
            LedgerCommand::AddMember { .. } => "add_member",
            LedgerCommand::RecordPayment { .. } => "record_payment",
            LedgerCommand::RemovePayment { .. } => "remove_payment",
            LedgerCommand::ShowSettlements { .. } => "show_settlements",
            LedgerCommand::SettleProject { .. } => "settle_project",
        }
    }
}

/// Result of dispatching a `LedgerCommand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LedgerOutcome {
    ProjectCreated { project: Project },
    MemberAdded { member: Member },
    PaymentRecorded { payment: Payment },
    PaymentRemoved { payment: Payment },
    Settlements { report: SettlementReport },
    ProjectSettled { project: Project },
}
