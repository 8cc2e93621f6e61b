//! HTTP adapters - REST API implementations.
//!
//! `api_router` assembles the public surface: the ledger routes under
//! `/api/warikan`, guarded by the bearer-token middleware, plus `/health`.

pub mod ledger;
pub mod middleware;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::application::LedgerService;
use crate::ports::SessionValidator;

pub use ledger::{ledger_routes, LedgerAppState};
pub use middleware::{auth_middleware, AuthState, RequireAuth};

/// Path prefix for every ledger endpoint.
pub const API_PREFIX: &str = "/api/warikan";

/// Builds the application router.
pub fn api_router(service: Arc<LedgerService>, validator: Arc<dyn SessionValidator>) -> Router {
    let auth_state: AuthState = validator;
    let api = ledger_routes(LedgerAppState::new(service)).layer(
        axum::middleware::from_fn_with_state(auth_state, auth_middleware),
    );

    Router::new()
        .route("/health", get(ledger::handlers::health))
        .nest(API_PREFIX, api)
}
