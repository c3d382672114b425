//! Entry point: load config, wire dependencies, and run the server.

use sso::config::Config;
use sso::db::{self, SqliteStorage};
use sso::{auth::PasswordHasher, create_app, AppState, AuthService};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    let registry = tracing_subscriber::registry().with(filter);
    if config.env.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(env = ?config.env, "starting sso");

    let db_pool = db::create_pool(&config.storage_path).await?;
    db::run_migrations(&db_pool).await?;
    let storage = Arc::new(SqliteStorage::new(db_pool));

    let passwords = PasswordHasher::new(config.hash_cost)?;
    let auth_service = AuthService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        passwords,
        config.token_ttl,
    );

    let app = create_app(AppState::new(auth_service), config.request_timeout);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    tracing::info!("gracefully stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "received signal"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "received signal"),
    }
}
