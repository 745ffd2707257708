//! Entrada do serviço de ativos

use std::net::SocketAddr;

use secrecy::ExposeSecret;
use sfera_adapter_postgres::{PostgresConfig, TransactionManager, check_connection, create_pool};
use asset_api::api::{AppState, build_router};
use asset_api::infrastructure::migrations;
use sfera_auth_core::TokenService;
use sfera_config::AppConfig;
use sfera_telemetry::{init_metrics, init_tracing, init_tracing_json};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;

    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    let metrics = init_metrics();

    info!(app = %config.app_name, env = %config.app_env, "Starting asset service");

    let pg_config = PostgresConfig::new(config.database.url.expose_secret())
        .with_max_connections(config.database.max_connections);
    let pool = create_pool(&pg_config).await?;
    check_connection(&pool).await?;

    migrations::run(&pool).await?;

    let state = AppState {
        tx: TransactionManager::new(pool),
        token_service: TokenService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.expires_in,
        ),
        upload: config.upload.clone(),
        metrics,
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
