//! Serving with a bounded graceful shutdown.
//!
//! On a termination signal the listener stops accepting connections and
//! in-flight requests get a fixed grace period to finish. Whatever is still
//! running when the grace period ends is abandoned.

use std::{future::Future, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Resolve once SIGINT or SIGTERM is received.
///
/// If a handler cannot be installed, that signal is logged and ignored so the
/// other one still works.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!(signal = "SIGINT", "shutdown signal received"),
        () = terminate => info!(signal = "SIGTERM", "shutdown signal received"),
    }
}

/// How serving ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// Every connection finished, or the server stopped on its own.
    Complete,
    /// The grace period elapsed with connections still open. Their tasks are
    /// detached and may still be running.
    Abandoned,
}

/// Serve `router` on `listener` until `signal` resolves, then drain for at
/// most `grace`.
///
/// Returns within `grace` of the signal regardless of what handlers are doing.
///
/// # Errors
///
/// Returns an error if the server fails before the signal arrives or while
/// draining.
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    router: Router,
    grace: Duration,
    signal: F,
) -> Result<Drain>
where
    F: Future<Output = ()> + Send,
{
    let stop = CancellationToken::new();
    let serve = axum::serve(listener, router).with_graceful_shutdown(stop.clone().cancelled_owned());
    let mut server = tokio::spawn(async move { serve.await });

    tokio::select! {
        joined = &mut server => {
            joined
                .context("server task panicked")?
                .context("server exited unexpectedly")?;
            return Ok(Drain::Complete);
        }
        () = signal => {}
    }

    info!(grace_secs = grace.as_secs_f64(), "draining in-flight requests");
    stop.cancel();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => {
            joined
                .context("server task panicked")?
                .context("server failed while draining")?;
            info!("server shut down gracefully");
            Ok(Drain::Complete)
        }
        Err(_) => {
            server.abort();
            warn!("grace period elapsed; abandoning in-flight requests");
            Ok(Drain::Abandoned)
        }
    }
}
