pub mod request_id;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, Method, Request},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::{
    checkout::CheckoutController, health, method_not_allowed,
    token_exchange::TokenExchangeController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

pub fn token_exchange_routes(controller: Arc<TokenExchangeController>) -> Router {
    Router::new()
        .route(
            "/api/bling/exchange",
            post(TokenExchangeController::exchange).fallback(method_not_allowed),
        )
        .with_state(controller)
}

pub fn checkout_routes(controller: Arc<CheckoutController>) -> Router {
    Router::new()
        .route(
            "/api/checkout",
            post(CheckoutController::submit).fallback(method_not_allowed),
        )
        .with_state(controller)
}

/// Assemble every route with the shared middleware stack.
pub fn build_router(
    pool: Arc<DbPool>,
    config: &Config,
    token_exchange_controller: Arc<TokenExchangeController>,
    checkout_controller: Arc<CheckoutController>,
) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(token_exchange_routes(token_exchange_controller))
        .merge(checkout_routes(checkout_controller))
        .layer(cors_layer(config))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(http_span))
}

/// Span for the trace layer. Only the path is recorded because the query
/// string may carry authorization codes or refresh tokens.
fn http_span(request: &Request<Body>) -> tracing::Span {
    tracing::debug_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version()
    )
}

/// Development allows any origin; production only the storefront origins.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Start the HTTP server and serve until SIGINT/SIGTERM
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
