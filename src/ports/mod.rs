//! Ports (interfaces) for external adapters.
//!
//! Ports define the contracts that adapters must implement.
//! This follows the hexagonal architecture pattern.
//!
//! # Ports
//!
//! - `LedgerStore` - Durable projects, members and payment logs
//! - `SessionValidator` - Bearer token validation at the API boundary

mod ledger_store;
mod session_validator;

pub use ledger_store::{LedgerSnapshot, LedgerStore, ProjectPage};
pub use session_validator::SessionValidator;
