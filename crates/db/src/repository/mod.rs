//! Repository functions — one module per table, one function per
//! database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! No business logic, no domain types — pure SQL.

pub mod workflows;
pub mod templates;
pub mod candidates;
pub mod jobs;
pub mod offers;
pub mod profiles;
pub mod executions;
pub mod email_logs;
