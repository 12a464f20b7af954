// Petgate HTTP server
// Decision: Configuration is read once from the environment (and .env) before anything binds

use anyhow::{Context, Result};
use petgate_server::{build_app, GatewayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; explicit environment wins either way
    let _ = dotenvy::dotenv();

    // RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petgate_server=debug,petgate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("petgate starting...");

    let config = GatewayConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        username = %config.auth.credentials.username,
        cookie_secure = config.auth.cookie_secure,
        session_max_age = ?config.auth.session.max_age,
        token_lifetime = ?config.auth.jwt.access_token_lifetime,
        "Authentication configured"
    );

    let addr = config.bind_addr;
    let app = build_app(config).context("Failed to build routes")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
