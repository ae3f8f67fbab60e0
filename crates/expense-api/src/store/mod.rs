//! Expense persistence: the storage port used by handlers and its PostgreSQL
//! adapter.
//!
//! Handlers only see [`ExpenseStore`]. The entrypoint constructs a
//! [`PgExpenseStore`], ensures the table exists, and hands it to the router
//! inside [`crate::server::state::AppState`].

pub mod postgres;

pub use postgres::PgExpenseStore;

use async_trait::async_trait;
use common::{Expense, ExpenseInput};
use thiserror::Error;

/// Errors raised by storage adapters.
///
/// The `Display` text of [`StoreError::Query`] is the driver's own message and
/// is surfaced to callers unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached when opening the pool.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A statement failed while executing or decoding its rows.
    #[error("{0}")]
    Query(String),
}

/// Port for reading and writing expenses.
///
/// `id` arguments are the raw path segment; matching it against the stored
/// key type is the adapter's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Insert a new expense and return it with its assigned id.
    async fn create(&self, input: &ExpenseInput) -> Result<Expense, StoreError>;

    /// Find a single expense by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Expense>, StoreError>;

    /// Read every expense, in whatever order storage yields them.
    async fn list(&self) -> Result<Vec<Expense>, StoreError>;

    /// Replace all mutable fields of the expense with `id`.
    ///
    /// Returns `None` when no expense has that id.
    async fn update(&self, id: &str, input: &ExpenseInput)
        -> Result<Option<Expense>, StoreError>;
}
