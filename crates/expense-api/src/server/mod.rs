//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Authenticate every request with HTTP Basic credentials.
//! - Inject shared application state (`AppState`) into handlers.
//! - Serve until a termination signal, then drain within a grace period.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod shutdown;
pub mod state;
