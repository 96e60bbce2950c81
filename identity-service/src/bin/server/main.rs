use std::sync::Arc;

use auth::TokenSigner;
use chrono::Duration;
use identity_service::config::Config;
use identity_service::domain::session::service::SessionService;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::PostgresRefreshTokenRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        cookie_domain = %config.cookies.domain,
        access_ttl_minutes = config.tokens.access_ttl_minutes,
        refresh_ttl_days = config.tokens.refresh_ttl_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));

    let access_signer = TokenSigner::new(
        config.tokens.access_secret.as_bytes(),
        Duration::minutes(config.tokens.access_ttl_minutes),
    );
    let refresh_signer = TokenSigner::new(
        config.tokens.refresh_secret.as_bytes(),
        Duration::days(config.tokens.refresh_ttl_days),
    );

    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&refresh_token_repository),
    ));
    let session_service = Arc::new(SessionService::new(
        user_repository,
        refresh_token_repository,
        access_signer,
        refresh_signer,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, session_service, config.cookies.domain);

    axum::serve(http_listener, http_application).await?;

    Ok(())
}
