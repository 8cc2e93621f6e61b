//! HTTP handlers for ledger endpoints.
//!
//! Handlers translate HTTP requests into ledger commands and queries, delegate
//! to `LedgerService`, and map `LedgerError` onto status codes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    AddMemberCommand, CreateProjectCommand, LedgerService, RecordPaymentCommand,
    RemovePaymentCommand, SettleProjectCommand,
};
use crate::domain::foundation::{
    AuthenticatedUser, CommandMetadata, CommandSource, MemberId, Money, PaymentId, ProjectId,
    UserId,
};
use crate::domain::ledger::LedgerError;

use super::dto::{
    AddMemberRequest, CreateProjectRequest, ErrorResponse, ListProjectsParams, MemberResponse,
    PaymentCreatedResponse, PaymentResponse, ProjectDetailsResponse, ProjectListResponse,
    ProjectResponse, RecordPaymentRequest, SettlementResponse,
};

/// Header carrying the caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// ════════════════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for ledger handlers.
#[derive(Clone)]
pub struct LedgerAppState {
    pub service: Arc<LedgerService>,
}

impl LedgerAppState {
    pub fn new(service: Arc<LedgerService>) -> Self {
        Self { service }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /projects - Create a project owned by the caller
pub async fn create_project(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Response {
    let cmd = CreateProjectCommand {
        name: req.name,
        display_name: req.display_name.or_else(|| user.display_name.clone()),
    };

    match state
        .service
        .create_project(cmd, metadata_for(&user, &headers))
        .await
    {
        Ok(project) => (StatusCode::CREATED, Json(ProjectResponse::from(&project))).into_response(),
        Err(e) => handle_ledger_error(e),
    }
}

/// POST /projects/:project_id/members - Add a linked member or guest
pub async fn add_member(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> Response {
    let project_id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let external_user_id = match req.external_user_id {
        Some(raw) => match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(e) => return handle_ledger_error(e.into()),
        },
        None => None,
    };

    let cmd = AddMemberCommand {
        project_id,
        display_name: req.display_name,
        external_user_id,
    };

    match state.service.add_member(cmd, metadata_for(&user, &headers)).await {
        Ok(member) => (StatusCode::CREATED, Json(MemberResponse::from(&member))).into_response(),
        Err(e) => handle_ledger_error(e),
    }
}

/// POST /projects/:project_id/payments - Record a payment
pub async fn record_payment(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<RecordPaymentRequest>,
) -> Response {
    let project_id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let payer = match MemberId::new(req.payer) {
        Ok(id) => id,
        Err(e) => return handle_ledger_error(e.into()),
    };
    let participants = match req.participants {
        Some(raw) => match raw
            .into_iter()
            .map(MemberId::new)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(ids) => Some(ids),
            Err(e) => return handle_ledger_error(e.into()),
        },
        None => None,
    };

    let cmd = RecordPaymentCommand {
        project_id,
        payer,
        amount: Money::from_minor(req.amount),
        description: req.description,
        participants,
    };

    match state
        .service
        .record_payment(cmd, metadata_for(&user, &headers))
        .await
    {
        Ok(payment) => (
            StatusCode::CREATED,
            Json(PaymentCreatedResponse {
                id: payment.id.to_string(),
            }),
        )
            .into_response(),
        Err(e) => handle_ledger_error(e),
    }
}

/// DELETE /projects/:project_id/payments/:payment_id - Remove a payment
pub async fn remove_payment(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path((project_id, payment_id)): Path<(String, String)>,
) -> Response {
    let project_id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let payment_id: PaymentId = match payment_id.parse() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid payment ID format"),
    };

    let cmd = RemovePaymentCommand {
        project_id,
        payment_id,
    };

    match state
        .service
        .remove_payment(cmd, metadata_for(&user, &headers))
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_ledger_error(e),
    }
}

/// POST /projects/:project_id/settle - Close the project
pub async fn settle_project(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Response {
    let project_id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .service
        .settle_project(SettleProjectCommand { project_id }, metadata_for(&user, &headers))
        .await
    {
        Ok(project) => (StatusCode::OK, Json(ProjectResponse::from(&project))).into_response(),
        Err(e) => handle_ledger_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /projects - List the caller's projects, most recently active first
pub async fn list_projects(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListProjectsParams>,
) -> Response {
    let cursor = match params.cursor.as_deref() {
        Some(raw) => match raw.parse::<ProjectId>() {
            Ok(id) => Some(id),
            Err(_) => return bad_request("Invalid cursor format"),
        },
        None => None,
    };

    match state.service.list_projects(&user.id, params.limit, cursor).await {
        Ok(page) => (StatusCode::OK, Json(ProjectListResponse::from(&page))).into_response(),
        Err(e) => handle_ledger_error(e),
    }
}

/// GET /projects/:project_id - Project header and members
pub async fn get_project(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    Path(project_id): Path<String>,
) -> Response {
    let project_id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.get_project(project_id, &user.id).await {
        Ok(details) => {
            let response = ProjectDetailsResponse {
                project: ProjectResponse::from(&details.project),
                members: details.members.iter().map(MemberResponse::from).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_ledger_error(e),
    }
}

/// GET /projects/:project_id/payments - Payment log in creation order
pub async fn list_payments(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    Path(project_id): Path<String>,
) -> Response {
    let project_id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.list_payments(project_id, &user.id).await {
        Ok(payments) => {
            let body: Vec<PaymentResponse> = payments.iter().map(PaymentResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => handle_ledger_error(e),
    }
}

/// GET /projects/:project_id/settlements - Balances and suggested transfers
pub async fn get_settlements(
    State(state): State<LedgerAppState>,
    RequireAuth(user): RequireAuth,
    Path(project_id): Path<String>,
) -> Response {
    let project_id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.get_settlements(project_id, &user.id).await {
        Ok(report) => (StatusCode::OK, Json(SettlementResponse::from(&report))).into_response(),
        Err(e) => handle_ledger_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

fn metadata_for(user: &AuthenticatedUser, headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new(user.id.clone()).with_source(CommandSource::Http);
    match headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        Some(request_id) => metadata.with_correlation_id(request_id),
        None => metadata,
    }
}

fn parse_project_id(raw: &str) -> Result<ProjectId, Response> {
    raw.parse()
        .map_err(|_| bad_request("Invalid project ID format"))
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message))).into_response()
}

/// Maps ledger errors onto HTTP status codes.
pub fn handle_ledger_error(error: LedgerError) -> Response {
    let status = match &error {
        LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
        LedgerError::Forbidden(_) => StatusCode::FORBIDDEN,
        LedgerError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        LedgerError::InvalidState(_) | LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::Infrastructure(msg) => {
            tracing::error!("Ledger infrastructure error: {}", msg);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("An internal error occurred")),
            )
                .into_response();
        }
    };

    let mut body = ErrorResponse::new(error.code().to_string(), error.message());
    match &error {
        LedgerError::NotFound { resource, id } => {
            body = body.with_details(serde_json::json!({
                "resource": resource.as_str(),
                "id": id,
            }));
        }
        LedgerError::ValidationFailed { field, .. } => {
            body = body.with_details(serde_json::json!({ "field": field }));
        }
        _ => {}
    }

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn error_mapping_covers_every_variant() {
        let cases = [
            (LedgerError::project_not_found(&ProjectId::new()), StatusCode::NOT_FOUND),
            (LedgerError::forbidden("no"), StatusCode::FORBIDDEN),
            (LedgerError::validation("amount", "bad"), StatusCode::BAD_REQUEST),
            (LedgerError::invalid_state("settled"), StatusCode::CONFLICT),
            (LedgerError::conflict("busy"), StatusCode::CONFLICT),
            (LedgerError::infrastructure("db down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_ledger_error(error).status(), expected);
        }
    }

    #[test]
    fn malformed_project_id_is_bad_request() {
        let response = parse_project_id("not-a-uuid").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn request_id_header_becomes_correlation_id() {
        let user = AuthenticatedUser::new(UserId::new("U-1").unwrap(), None);
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-42"));

        let metadata = metadata_for(&user, &headers);

        assert_eq!(metadata.correlation_id(), "req-42");
        assert_eq!(metadata.source(), CommandSource::Http);
    }
}
