use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shootdesk_api::background::session_cleanup;
use shootdesk_api::config::ServerConfig;
use shootdesk_api::overrides::OrderOverrides;
use shootdesk_api::payments::build_gateway;
use shootdesk_api::router::build_app_router;
use shootdesk_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        merge_policy = %config.merge_policy,
        payments = config.payment.is_configured(),
        "Configuration loaded"
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = connect_database(&database_url).await;

    let overrides = open_overrides(&config);
    let payments = build_gateway(&config.payment).expect("Failed to build payment gateway");

    let cleanup_cancel = CancellationToken::new();
    let cleanup = tokio::spawn(session_cleanup::run(pool.clone(), cleanup_cancel.clone()));

    let overrides = Arc::new(overrides);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        overrides: Arc::clone(&overrides),
        payments,
    };
    let app = build_app_router(state, &config);

    let ip = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot bind {addr}: {e}"));
    tracing::info!(%addr, "Portal API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    overrides.flush().await;
    cleanup_cancel.cancel();
    if tokio::time::timeout(Duration::from_secs(5), cleanup).await.is_err() {
        tracing::warn!("Session cleanup did not stop within 5s");
    }
    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shootdesk_api=debug,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify, and migrate. Any failure aborts startup.
async fn connect_database(url: &str) -> PgPool {
    let pool = shootdesk_db::create_pool(url)
        .await
        .expect("Failed to connect to database");
    shootdesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    shootdesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");
    pool
}

fn open_overrides(config: &ServerConfig) -> OrderOverrides {
    let Some(dir) = &config.override_store_dir else {
        tracing::warn!("OVERRIDE_STORE_DIR not set; overrides will not survive a restart");
        return OrderOverrides::in_memory(config.merge_policy);
    };

    let overrides = OrderOverrides::open(dir, config.merge_policy)
        .unwrap_or_else(|e| panic!("Failed to open override store: {e}"));
    tracing::info!(
        dir = %dir.display(),
        status = overrides.status.len(),
        payment = overrides.payment.len(),
        assets = overrides.assets.len(),
        "Override store loaded"
    );
    overrides
}

/// Wait for SIGINT or (on Unix) SIGTERM.
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

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Draining connections");
}
