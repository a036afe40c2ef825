use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{error, info};

use accounts_api::application::ports::account_repository::AccountRepository;
use accounts_api::bootstrap::app_context::{AppContext, AppServices};
use accounts_api::bootstrap::config::{Config, StoreBackend};
use accounts_api::bootstrap::store_connection::{Bootstrapper, ConnectionError};
use accounts_api::infrastructure::crypto::Argon2CredentialHasher;
use accounts_api::infrastructure::db::PgConnector;
use accounts_api::infrastructure::db::repositories::account_repository_memory::MemoryConnector;
use accounts_api::infrastructure::db::repositories::account_repository_sqlx::SqlxAccountRepository;

async fn connect_store(cfg: &Config) -> anyhow::Result<Arc<dyn AccountRepository>> {
    let bootstrapper = Bootstrapper::new(cfg.retry_policy());
    let repo: Arc<dyn AccountRepository> = match cfg.store_backend {
        StoreBackend::Postgres => {
            let connector = PgConnector::new(&cfg.database_url, cfg.db_max_connections);
            let pool = bootstrapper.run(&connector).await?.handle;
            accounts_api::infrastructure::db::migrate(&pool).await?;
            Arc::new(SqlxAccountRepository::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("store_backend_memory_accounts_are_not_persisted");
            Arc::new(bootstrapper.run(&MemoryConnector).await?.handle)
        }
    };
    Ok(repo)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "accounts_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting accounts backend");

    // Nothing is served until the store is reachable.
    let account_repo = match connect_store(&cfg).await {
        Ok(repo) => repo,
        Err(e) => {
            if let Some(conn) = e.downcast_ref::<ConnectionError>() {
                error!(
                    attempts = conn.attempts,
                    error = ?conn.last_error,
                    "Failed to connect to store. Exiting"
                );
            } else {
                error!(error = ?e, "Store initialization failed. Exiting");
            }
            std::process::exit(1);
        }
    };

    let services = AppServices::new(account_repo, Arc::new(Argon2CredentialHasher::new()));
    let ctx = AppContext::new(cfg.clone(), services);
    let app = accounts_api::presentation::app_router(ctx);

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    info!(%api_addr, "HTTP API listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
