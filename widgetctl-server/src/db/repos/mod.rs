//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list projections (no N+1)
//! - Relies on constraints for conflicts (no check-then-insert)
//! - One statement per mutation, committed on its own

pub mod widgets;
pub mod installations;

pub use widgets::{Widget, WidgetRepo};
pub use installations::{Installation, InstallationRepo, InstallationView};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// SQLSTATE for `datetime_field_overflow`
const DATETIME_OVERFLOW: &str = "22008";

/// Constraint failure reported by Postgres, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
    Check,
    DateOverflow,
}

pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
    let db_err = err.as_database_error()?;
    if db_err.is_unique_violation() {
        Some(Violation::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey)
    } else if db_err.is_check_violation() {
        Some(Violation::Check)
    } else if db_err.code().as_deref() == Some(DATETIME_OVERFLOW) {
        Some(Violation::DateOverflow)
    } else {
        None
    }
}
