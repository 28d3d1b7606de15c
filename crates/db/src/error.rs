//! Classification of storage errors.

use sea_orm::{ConnAcquireErr, DbErr, SqlErr};

use docledger_shared::AppError;

/// Maps a `DbErr` onto the application taxonomy.
///
/// Pool acquire timeouts become `StorageTimeout`, lost or unreachable
/// connections become `StorageUnavailable`, everything else is `Database`.
pub fn storage_error(err: DbErr) -> AppError {
    match &err {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
            AppError::StorageTimeout(err.to_string())
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            AppError::StorageUnavailable(err.to_string())
        }
        DbErr::RecordNotFound(what) => AppError::NotFound(what.clone()),
        _ => AppError::Database(err.to_string()),
    }
}

/// Like [`storage_error`], but reports unique-key violations as `Validation`.
pub fn write_error(err: DbErr, duplicate: impl FnOnce() -> String) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Validation(duplicate()),
        _ => storage_error(err),
    }
}
