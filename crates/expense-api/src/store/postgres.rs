//! PostgreSQL-backed [`ExpenseStore`] built on a `sqlx` connection pool.

use async_trait::async_trait;
use common::{Expense, ExpenseInput};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use tracing::info;

use super::{ExpenseStore, StoreError};

/// Idempotent table creation run at every startup.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS expenses (
        id SERIAL PRIMARY KEY,
        title TEXT,
        amount FLOAT,
        note TEXT,
        tags TEXT[]
    )
"#;

const INSERT_EXPENSE: &str =
    "INSERT INTO expenses (title, amount, note, tags) VALUES ($1, $2, $3, $4) RETURNING id";

// The id is bound as text and cast by the server, so a non-numeric path
// segment fails in the database rather than in the handler.
const SELECT_EXPENSE: &str =
    "SELECT id, title, amount, note, tags FROM expenses WHERE id = $1::integer";

const SELECT_EXPENSES: &str = "SELECT id, title, amount, note, tags FROM expenses";

const UPDATE_EXPENSE: &str = r#"
    UPDATE expenses SET title = $1, amount = $2, note = $3, tags = $4
    WHERE id = $5::integer
    RETURNING id, title, amount, note, tags
"#;

/// One row of the `expenses` table.
#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: i32,
    title: String,
    amount: f64,
    note: String,
    tags: Vec<String>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            amount: row.amount,
            note: row.note,
            tags: row.tags,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

/// Expense storage in a single PostgreSQL table.
///
/// Cheap to clone: the underlying [`PgPool`] is reference-counted and safe to
/// share across request tasks.
#[derive(Clone, Debug)]
pub struct PgExpenseStore {
    pool: PgPool,
}

impl PgExpenseStore {
    /// Open a connection pool against `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the first connection cannot be
    /// established.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `expenses` table if it does not already exist.
    ///
    /// Safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("expenses table ready");
        Ok(())
    }

    /// Close every pooled connection, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ExpenseStore for PgExpenseStore {
    async fn create(&self, input: &ExpenseInput) -> Result<Expense, StoreError> {
        let id = sqlx::query_scalar::<_, i32>(INSERT_EXPENSE)
            .bind(&input.title)
            .bind(input.amount)
            .bind(&input.note)
            .bind(&input.tags)
            .fetch_one(&self.pool)
            .await?;
        Ok(input.clone().with_id(id))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Expense>, StoreError> {
        let row = sqlx::query_as::<_, ExpenseRow>(SELECT_EXPENSE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Expense::from))
    }

    async fn list(&self) -> Result<Vec<Expense>, StoreError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(SELECT_EXPENSES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn update(
        &self,
        id: &str,
        input: &ExpenseInput,
    ) -> Result<Option<Expense>, StoreError> {
        let row = sqlx::query_as::<_, ExpenseRow>(UPDATE_EXPENSE)
            .bind(&input.title)
            .bind(input.amount)
            .bind(&input.note)
            .bind(&input.tags)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Expense::from))
    }
}
