//! Common types, validation rules, and errors shared across `expense-svc` crates.

pub mod error;
pub mod expense;
pub mod protocol;

pub use error::ServiceError;
pub use expense::{Expense, ExpenseInput, ValidationError};
