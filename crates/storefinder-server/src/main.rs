mod api;
mod middleware;

use std::sync::Arc;

use storefinder_finder::{PgStoreCatalog, StoreCatalog};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // With a database the server owns the pool so the health check can ping it.
    let (catalog, pool) = if config.database_url.is_some() {
        let pool = storefinder_db::connect_pool_from_config(&config).await?;
        let applied = storefinder_db::run_migrations(&pool).await?;
        tracing::info!(applied, "migrations up to date");
        let catalog: Arc<dyn StoreCatalog> = Arc::new(PgStoreCatalog::new(pool.clone()));
        (catalog, Some(pool))
    } else {
        (storefinder_finder::catalog_from_config(&config).await?, None)
    };

    let finder = storefinder_finder::build_finder(&config, catalog)?;
    let app = build_app(AppState {
        finder: Arc::new(finder),
        pool,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "storefinder server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
