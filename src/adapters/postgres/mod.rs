//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresLedgerStore` - Projects, members and payments with optimistic
//!   concurrency on the project row

mod ledger_store;

pub use ledger_store::PostgresLedgerStore;
