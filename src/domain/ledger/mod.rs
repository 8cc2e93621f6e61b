//! Ledger module - projects, members, payments, and settlement.
//!
//! The balance accumulator and settlement solver are pure functions over a
//! ledger snapshot. Everything that touches storage lives behind the
//! `LedgerStore` port.

mod balance;
mod command;
mod errors;
mod member;
mod payment;
mod project;
mod report;
mod settlement;

pub use balance::{BalanceAccumulator, BalanceSheet};
pub use command::{LedgerCommand, LedgerOutcome};
pub use errors::{LedgerError, LedgerResource};
pub use member::{Member, NewMember, DEFAULT_OWNER_DISPLAY_NAME, MAX_DISPLAY_NAME_LEN};
pub use payment::{NewPayment, Payment, MAX_DESCRIPTION_LEN};
pub use project::{Project, ProjectName, ProjectStatus, MAX_PROJECT_NAME_LEN};
pub use report::{MemberBalance, SettlementLine, SettlementReport};
pub use settlement::{apply_transfers, SettlementSolver, SettlementState, Transfer};
