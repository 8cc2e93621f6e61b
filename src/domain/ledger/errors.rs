//! Ledger-specific error types.

use std::fmt;

use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, PaymentId, ProjectId, ValidationError,
};

/// Kind of ledger record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerResource {
    Project,
    Member,
    Payment,
}

impl LedgerResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerResource::Project => "Project",
            LedgerResource::Member => "Member",
            LedgerResource::Payment => "Payment",
        }
    }
}

/// Errors surfaced by the ledger service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A referenced record does not exist.
    NotFound { resource: LedgerResource, id: String },
    /// Caller is not allowed to perform the operation.
    Forbidden(String),
    /// Input failed validation.
    ValidationFailed { field: String, message: String },
    /// Project status does not allow the operation.
    InvalidState(String),
    /// Concurrent writers kept colliding until retries ran out.
    Conflict(String),
    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl LedgerError {
    pub fn project_not_found(id: &ProjectId) -> Self {
        LedgerError::NotFound {
            resource: LedgerResource::Project,
            id: id.to_string(),
        }
    }
    pub fn member_not_found(id: &MemberId) -> Self {
        LedgerError::NotFound {
            resource: LedgerResource::Member,
            id: id.to_string(),
        }
    }
    pub fn payment_not_found(id: &PaymentId) -> Self {
        LedgerError::NotFound {
            resource: LedgerResource::Payment,
            id: id.to_string(),
        }
    }
    pub fn forbidden(message: impl Into<String>) -> Self {
        LedgerError::Forbidden(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn invalid_state(message: impl Into<String>) -> Self {
        LedgerError::InvalidState(message.into())
    }
    pub fn conflict(message: impl Into<String>) -> Self {
        LedgerError::Conflict(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        LedgerError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::NotFound { resource, .. } => match resource {
                LedgerResource::Project => ErrorCode::ProjectNotFound,
                LedgerResource::Member => ErrorCode::MemberNotFound,
                LedgerResource::Payment => ErrorCode::PaymentNotFound,
            },
            LedgerError::Forbidden(_) => ErrorCode::Forbidden,
            LedgerError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            LedgerError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            LedgerError::Conflict(_) => ErrorCode::Conflict,
            LedgerError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LedgerError::NotFound { resource, id } => {
                format!("{} not found: {}", resource.as_str(), id)
            }
            LedgerError::Forbidden(msg) => format!("Permission denied: {}", msg),
            LedgerError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            LedgerError::InvalidState(msg) => format!("Invalid state: {}", msg),
            LedgerError::Conflict(msg) => format!("Concurrent update conflict: {}", msg),
            LedgerError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// True if the same request may succeed when sent again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Conflict(_) | LedgerError::Infrastructure(_))
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for LedgerError {}

impl From<DomainError> for LedgerError {
    fn from(err: DomainError) -> Self {
        let id = err.detail("id").unwrap_or("unknown").to_string();
        match err.code {
            ErrorCode::ProjectNotFound => LedgerError::NotFound {
                resource: LedgerResource::Project,
                id,
            },
            ErrorCode::MemberNotFound => LedgerError::NotFound {
                resource: LedgerResource::Member,
                id,
            },
            ErrorCode::PaymentNotFound => LedgerError::NotFound {
                resource: LedgerResource::Payment,
                id,
            },
            ErrorCode::Forbidden | ErrorCode::Unauthorized => LedgerError::Forbidden(err.message),
            ErrorCode::ValidationFailed => LedgerError::ValidationFailed {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition | ErrorCode::ProjectSettled => {
                LedgerError::InvalidState(err.message)
            }
            ErrorCode::Conflict => LedgerError::Conflict(err.message),
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                LedgerError::Infrastructure(err.to_string())
            }
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<LedgerError> for DomainError {
    fn from(err: LedgerError) -> Self {
        let code = err.code();
        let message = err.message();
        match err {
            LedgerError::NotFound { id, .. } => DomainError::new(code, message).with_detail("id", id),
            LedgerError::ValidationFailed { field, .. } => {
                DomainError::new(code, message).with_detail("field", field)
            }
            _ => DomainError::new(code, message),
        }
    }
}
