//! Axum request handlers for the expense endpoints.
//!
//! Every failure is converted here into a [`ServiceError`] and rendered as an
//! [`ErrorResponse`] body with the matching status code.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, Expense, ExpenseInput, ServiceError};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use crate::store::StoreError;

/// Message returned when a read finds no expense for the id.
pub const EXPENSE_NOT_FOUND: &str = "expense's not found";

/// Message returned when an update finds no expense for the id.
pub const UPDATED_EXPENSE_NOT_FOUND: &str = "updated expense's not found";

/// `POST /expenses`: validate and insert a new expense.
pub async fn create_expense(
    State(state): State<AppState>,
    body: Result<Json<ExpenseInput>, JsonRejection>,
) -> Response {
    respond(StatusCode::CREATED, create(&state, body).await)
}

/// `GET /expenses/:id`: fetch a single expense.
pub async fn get_expense(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let result = match parse_id(id) {
        Ok(id) => find(&state, &id).await,
        Err(err) => Err(err),
    };
    respond(StatusCode::OK, result)
}

/// `GET /expenses`: fetch every expense.
///
/// An empty table yields `[]`. If reading any row fails, the rows already read
/// are discarded and only the error is returned.
pub async fn list_expenses(State(state): State<AppState>) -> Response {
    let result = state.store.list().await.map_err(storage_failure);
    respond(StatusCode::OK, result)
}

/// `PUT /expenses/:id`: replace every field of an existing expense.
///
/// The id in the path is authoritative; any id in the body is ignored.
pub async fn update_expense(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<ExpenseInput>, JsonRejection>,
) -> Response {
    let result = match parse_id(id) {
        Ok(id) => update(&state, &id, body).await,
        Err(err) => Err(err),
    };
    respond(StatusCode::OK, result)
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

async fn create(
    state: &AppState,
    body: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<Expense, ServiceError> {
    let input = parse_body(body)?;
    input.validate()?;
    state.store.create(&input).await.map_err(storage_failure)
}

async fn find(state: &AppState, id: &str) -> Result<Expense, ServiceError> {
    state
        .store
        .find_by_id(id)
        .await
        .map_err(storage_failure)?
        .ok_or_else(|| ServiceError::NotFound(EXPENSE_NOT_FOUND.into()))
}

async fn update(
    state: &AppState,
    id: &str,
    body: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<Expense, ServiceError> {
    let input = parse_body(body)?;
    input.validate()?;
    state
        .store
        .update(id, &input)
        .await
        .map_err(storage_failure)?
        .ok_or_else(|| ServiceError::NotFound(UPDATED_EXPENSE_NOT_FOUND.into()))
}

fn parse_body(
    body: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<ExpenseInput, ServiceError> {
    body.map(|Json(input)| input)
        .map_err(|rejection| ServiceError::Parse(rejection.body_text()))
}

// An undecodable id can never name a row; it fails the lookup the same way a
// non-numeric one fails in the database.
fn parse_id(id: Result<Path<String>, PathRejection>) -> Result<String, ServiceError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        warn!(error = %rejection.body_text(), "expense id could not be decoded");
        ServiceError::Internal(rejection.body_text())
    })
}

fn storage_failure(err: StoreError) -> ServiceError {
    warn!(error = %err, "expense storage operation failed");
    ServiceError::Internal(err.to_string())
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}
