//! `expense-svc` HTTP service entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging.
//! 3. Connect to PostgreSQL and create the `expenses` table if absent.
//! 4. Build the Axum router around the store and the accepted credentials.
//! 5. Serve until SIGINT/SIGTERM, then drain in-flight requests within the
//!    configured grace period.

mod config;
mod server;
mod store;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use config::Config;
use server::{middleware::Credentials, shutdown::Drain, state::AppState};
use store::PgExpenseStore;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    // Telemetry is not yet up; a failure here is reported by `main`'s return.
    let cfg = Config::from_env().context("configuration invalid")?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        "expense-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Database
    // -----------------------------------------------------------------------
    let store = PgExpenseStore::connect(&cfg.database_url, cfg.db_max_connections)
        .await
        .context("failed to initialise database")?;
    store
        .ensure_schema()
        .await
        .context("can not create table expenses")?;

    // -----------------------------------------------------------------------
    // 4. Router
    // -----------------------------------------------------------------------
    let credentials = Credentials::new(cfg.auth_username.clone(), cfg.auth_password.clone());
    let state = AppState::new(Arc::new(store.clone()), credentials);
    let router = server::router::build(state);

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    let drain = server::shutdown::serve_with_grace(
        listener,
        router,
        cfg.shutdown_grace(),
        server::shutdown::shutdown_signal(),
    )
    .await?;

    // Abandoned requests may still hold pooled connections, and closing the
    // pool would wait for them indefinitely.
    match drain {
        Drain::Complete => store.close().await,
        Drain::Abandoned => warn!("skipping database pool close; connections still in use"),
    }
    info!("expense-svc stopped");
    Ok(())
}
