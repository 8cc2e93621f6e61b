//! warikan-ledger server entry point.
//!
//! Loads configuration, picks the ledger store, and serves the REST API.

use std::sync::Arc;

use axum::Router;
use http::{HeaderName, HeaderValue};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use warikan_ledger::adapters::http::ledger::REQUEST_ID_HEADER;
use warikan_ledger::adapters::{
    api_router, InMemoryLedgerStore, JwtSessionValidator, PostgresLedgerStore, RetryPolicy,
};
use warikan_ledger::application::{LedgerService, LedgerSettings, PageLimits};
use warikan_ledger::config::{AppConfig, DatabaseConfig, LedgerConfig, ServerConfig};
use warikan_ledger::domain::foundation::Money;
use warikan_ledger::ports::{LedgerStore, SessionValidator};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let retry = RetryPolicy::new(
        config.ledger.max_write_attempts,
        config.ledger.retry_base_delay(),
    );
    let store: Arc<dyn LedgerStore> = match &config.database {
        Some(database) => Arc::new(PostgresLedgerStore::with_retry_policy(
            connect(database).await?,
            retry,
        )),
        None => {
            tracing::warn!("No database configured, ledger data lives in memory only");
            Arc::new(InMemoryLedgerStore::with_retry_policy(retry))
        }
    };

    let service = Arc::new(LedgerService::new(store, ledger_settings(&config.ledger)));
    let validator: Arc<dyn SessionValidator> = Arc::new(JwtSessionValidator::new(
        &config.auth.jwt_secret,
        config.auth.issuer.as_deref(),
        config.auth.audience.as_deref(),
    ));

    let app = with_http_layers(api_router(service, validator), &config.server);

    let addr = config.server.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "warikan-ledger listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_filter));

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn connect(database: &DatabaseConfig) -> Result<sqlx::PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(pool)
}

fn ledger_settings(ledger: &LedgerConfig) -> LedgerSettings {
    LedgerSettings {
        settlement_tolerance: Money::from_minor(ledger.settlement_tolerance),
        page_limits: PageLimits {
            default: ledger.default_page_size,
            max: ledger.max_page_size,
        },
    }
}

fn with_http_layers(router: Router, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Outermost first: the request id exists before tracing and handlers see it.
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(cors)
            .layer(TimeoutLayer::new(server.request_timeout())),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
