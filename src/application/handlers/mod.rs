//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod ledger;

pub use ledger::{
    AddMemberCommand, AddMemberHandler, CreateProjectCommand, CreateProjectHandler,
    GetProjectHandler, GetProjectQuery, GetSettlementsHandler, GetSettlementsQuery,
    ListPaymentsHandler, ListPaymentsQuery, ListProjectsHandler, ListProjectsQuery, PageLimits,
    ProjectDetails, RecordPaymentCommand, RecordPaymentHandler, RemovePaymentCommand,
    RemovePaymentHandler, SettleProjectCommand, SettleProjectHandler,
};
