//! Ledger HTTP adapter.
//!
//! REST endpoints for projects, members, payments, and settlements.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{handle_ledger_error, LedgerAppState, REQUEST_ID_HEADER};
pub use routes::ledger_routes;
