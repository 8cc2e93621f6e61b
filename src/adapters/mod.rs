//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation (JWT, mock)
//! - `http` - axum REST API
//! - `memory` - In-memory ledger store
//! - `postgres` - PostgreSQL ledger store
//! - `retry` - Optimistic concurrency retry loop shared by the stores

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod retry;

pub use self::auth::{JwtSessionValidator, MockSessionValidator};
pub use self::http::api_router;
pub use memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;
pub use retry::RetryPolicy;
