//! Ledger command and query handlers.

mod access;
mod add_member;
mod create_project;
mod get_project;
mod get_settlements;
mod list_payments;
mod list_projects;
mod record_payment;
mod remove_payment;
mod settle_project;

#[cfg(test)]
pub(crate) mod test_support;

pub use add_member::{AddMemberCommand, AddMemberHandler};
pub use create_project::{CreateProjectCommand, CreateProjectHandler};
pub use get_project::{GetProjectHandler, GetProjectQuery, ProjectDetails};
pub use get_settlements::{GetSettlementsHandler, GetSettlementsQuery};
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery};
pub use list_projects::{ListProjectsHandler, ListProjectsQuery, PageLimits};
pub use record_payment::{RecordPaymentCommand, RecordPaymentHandler};
pub use remove_payment::{RemovePaymentCommand, RemovePaymentHandler};
pub use settle_project::{SettleProjectCommand, SettleProjectHandler};
