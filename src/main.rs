use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use storefront_backend::controllers::{checkout::CheckoutController, token_exchange::TokenExchangeController};
use storefront_backend::domain::{checkout::CheckoutService, token_exchange::TokenExchangeService};
use storefront_backend::infrastructure::config::{Config, LogFormat};
use storefront_backend::infrastructure::db::{check_connection, create_pool};
use storefront_backend::infrastructure::http::{build_router, start_http_server};
use storefront_backend::infrastructure::oauth::BlingOAuthClient;
use storefront_backend::infrastructure::repositories::OrderIntakeRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; a missing DATABASE_URL stops the process here
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting storefront backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Credentials are optional at startup; each exchange request re-checks them
    let bling_credentials = config.bling_credentials();
    if bling_credentials.is_none() {
        tracing::warn!("BLING_CLIENT_ID/BLING_CLIENT_SECRET not set; token exchange will answer 500");
    }

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories and outbound clients
    let order_intake_repo = Arc::new(OrderIntakeRepository::new(pool.clone()));
    let bling_client = Arc::new(BlingOAuthClient::new(
        config.bling_token_url.clone(),
        Duration::from_secs(config.bling_timeout_secs),
    )?);

    // 2. Services
    let token_exchange_service = Arc::new(TokenExchangeService::new(bling_credentials, bling_client));
    let checkout_service = Arc::new(CheckoutService::new(order_intake_repo));

    // 3. Controllers
    let token_exchange_controller = Arc::new(TokenExchangeController::new(token_exchange_service));
    let checkout_controller = Arc::new(CheckoutController::new(checkout_service));

    let app = build_router(pool, &config, token_exchange_controller, checkout_controller);

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
