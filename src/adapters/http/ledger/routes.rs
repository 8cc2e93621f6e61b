//! Axum router configuration for ledger endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    add_member, create_project, get_project, get_settlements, list_payments, list_projects,
    record_payment, remove_payment, settle_project, LedgerAppState,
};

/// Creates the ledger router.
///
/// # Routes
///
/// - `POST   /projects` - Create a project
/// - `GET    /projects` - List the caller's projects
/// - `GET    /projects/:project_id` - Project with members
/// - `POST   /projects/:project_id/members` - Add a member
/// - `POST   /projects/:project_id/payments` - Record a payment
/// - `GET    /projects/:project_id/payments` - List payments
/// - `DELETE /projects/:project_id/payments/:payment_id` - Remove a payment
/// - `GET    /projects/:project_id/settlements` - Balances and transfers
/// - `POST   /projects/:project_id/settle` - Close the project
pub fn ledger_routes(state: LedgerAppState) -> Router {
    Router::new()
        .route("/projects", post(create_project).get(list_projects))
        .route("/projects/:project_id", get(get_project))
        .route("/projects/:project_id/members", post(add_member))
        .route(
            "/projects/:project_id/payments",
            post(record_payment).get(list_payments),
        )
        .route(
            "/projects/:project_id/payments/:payment_id",
            delete(remove_payment),
        )
        .route("/projects/:project_id/settlements", get(get_settlements))
        .route("/projects/:project_id/settle", post(settle_project))
        .with_state(state)
}
