//! Data transfer objects for the ledger HTTP API.
//!
//! Requests carry raw strings and integers; handlers turn them into domain
//! types so malformed input comes back as a 400 with a field name.

use serde::{Deserialize, Serialize};

use crate::domain::ledger::{
    Member, MemberBalance, Payment, Project, SettlementLine, SettlementReport, SettlementState,
};
use crate::ports::ProjectPage;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a project. The caller becomes its owner.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    /// Owner's display name inside the project.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Request to add a member. Omit `external_user_id` to add a guest.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMemberRequest {
    pub display_name: String,
    #[serde(default)]
    pub external_user_id: Option<String>,
}

/// Request to record a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    /// Member id of whoever paid.
    pub payer: String,
    /// Amount in minor currency units.
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    /// Member ids sharing the cost. Omitted means everyone.
    #[serde(default)]
    pub participants: Option<Vec<String>>,
}

/// Query string for project listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProjectsParams {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub status: String,
    pub owner_member_id: String,
    pub total_amount: i64,
    pub member_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name.as_str().to_string(),
            status: project.status.as_str().to_string(),
            owner_member_id: project.owner_member_id.to_string(),
            total_amount: project.total_amount.minor_units(),
            member_count: project.member_count,
            created_at: project.created_at.to_rfc3339(),
            updated_at: project.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: String,
    pub display_name: String,
    pub is_guest: bool,
    pub external_user_id: Option<String>,
    pub added_at: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.to_string(),
            display_name: member.display_name.clone(),
            is_guest: member.is_guest,
            external_user_id: member.external_user_id.as_ref().map(|u| u.to_string()),
            added_at: member.added_at.to_rfc3339(),
        }
    }
}

/// Project header plus its roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetailsResponse {
    pub project: ProjectResponse,
    pub members: Vec<MemberResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
    pub next_cursor: Option<String>,
}

impl From<&ProjectPage> for ProjectListResponse {
    fn from(page: &ProjectPage) -> Self {
        Self {
            projects: page.projects.iter().map(ProjectResponse::from).collect(),
            next_cursor: page.next_cursor.map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: String,
    pub payer: String,
    pub amount: i64,
    pub description: Option<String>,
    /// `None` means the payment is shared by every member.
    pub participants: Option<Vec<String>>,
    pub created_at: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            payer: payment.payer_member_id.to_string(),
            amount: payment.amount.minor_units(),
            description: payment.description.clone(),
            participants: payment
                .participants
                .as_ref()
                .map(|ids| ids.iter().map(|id| id.to_string()).collect()),
            created_at: payment.created_at.to_rfc3339(),
        }
    }
}

/// Response to a recorded payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreatedResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub member_id: String,
    pub display_name: String,
    pub balance: i64,
}

impl From<&MemberBalance> for BalanceResponse {
    fn from(balance: &MemberBalance) -> Self {
        Self {
            member_id: balance.member_id.to_string(),
            display_name: balance.display_name.clone(),
            balance: balance.balance.minor_units(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub to_name: String,
    pub amount: i64,
}

impl From<&SettlementLine> for TransferResponse {
    fn from(line: &SettlementLine) -> Self {
        Self {
            from: line.from.to_string(),
            from_name: line.from_name.clone(),
            to: line.to.to_string(),
            to_name: line.to_name.clone(),
            amount: line.amount.minor_units(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub project_id: String,
    pub total_amount: i64,
    pub nothing_to_settle: bool,
    pub balances: Vec<BalanceResponse>,
    pub transfers: Vec<TransferResponse>,
}

impl From<&SettlementReport> for SettlementResponse {
    fn from(report: &SettlementReport) -> Self {
        Self {
            project_id: report.project_id.to_string(),
            total_amount: report.total_amount.minor_units(),
            nothing_to_settle: report.state == SettlementState::NothingToSettle,
            balances: report.balances.iter().map(BalanceResponse::from).collect(),
            transfers: report.transfers.iter().map(TransferResponse::from).collect(),
        }
    }
}

/// Error body shared by every ledger endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}
