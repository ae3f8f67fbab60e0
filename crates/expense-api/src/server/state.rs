//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::store::ExpenseStore;

use super::middleware::Credentials;

/// Application state shared across all request handlers.
///
/// Both fields are `Arc`-backed so that Axum can clone the state for each
/// request without copying anything expensive.
#[derive(Clone)]
pub struct AppState {
    /// Expense storage; the only shared resource between requests.
    pub store: Arc<dyn ExpenseStore>,
    /// The single credential pair accepted by Basic authentication.
    pub credentials: Arc<Credentials>,
}

impl AppState {
    /// Create a new [`AppState`] from a store and the accepted credentials.
    pub fn new(store: Arc<dyn ExpenseStore>, credentials: Credentials) -> Self {
        Self {
            store,
            credentials: Arc::new(credentials),
        }
    }
}
