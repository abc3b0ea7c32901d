use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crmsync_api::config::ServerConfig;
use crmsync_api::router::build_app_router;
use crmsync_api::state::AppState;
use crmsync_salesforce::{ContactApi, SalesforceAuth, SalesforceConfig};
use crmsync_sync::pg::PgSessionFactory;
use crmsync_sync::scheduler;
use crmsync_sync::{SyncScheduler, SyncSessionFactory};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crmsync_api=debug,crmsync_sync=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let salesforce_config = SalesforceConfig::from_env();
    tracing::info!(
        login_url = %salesforce_config.login_url,
        api_version = %salesforce_config.api_version,
        "Loaded Salesforce configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = crmsync_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    crmsync_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    crmsync_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Salesforce client ---
    let auth = Arc::new(SalesforceAuth::new(salesforce_config));
    let contacts = Arc::new(ContactApi::new(Arc::clone(&auth)));

    let sessions: Arc<dyn SyncSessionFactory> =
        Arc::new(PgSessionFactory::new(pool.clone(), auth, contacts));

    // --- Sync scheduler ---
    let sync_cancel = CancellationToken::new();
    let sync_handle = if config.sync_enabled {
        let sync_loop = SyncScheduler::new(Arc::clone(&sessions), config.sync_interval);
        Some(tokio::spawn(sync_loop.run(sync_cancel.clone())))
    } else {
        tracing::info!("Scheduled contact sync disabled (SYNC_ENABLED=false)");
        None
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sync_cancel.cancel();
    if let Some(handle) = sync_handle {
        let grace = Duration::from_secs(config.shutdown_timeout_secs);
        match scheduler::wait_for_shutdown(handle, grace).await {
            Ok(()) => tracing::info!("Sync scheduler stopped"),
            Err(e) => tracing::error!(error = %e, "Sync scheduler task failed"),
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
