//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;
mod service;

pub use handlers::{
    AddMemberCommand, CreateProjectCommand, PageLimits, ProjectDetails, RecordPaymentCommand,
    RemovePaymentCommand, SettleProjectCommand,
};
pub use service::{LedgerService, LedgerSettings};
