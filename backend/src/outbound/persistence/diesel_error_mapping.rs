//! Shared Diesel error mapping for the tea repositories.
//!
//! Each repository supplies constructors for its own port error; this module
//! decides which one applies and logs the underlying failure at `debug`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            error = %error,
            "diesel operation failed"
        ),
    }
}

/// Map Diesel errors onto query/connection constructors.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        DieselError::NotFound => query("record not found".to_owned()),
        other => query(other.to_string()),
    }
}

/// Whether `error` is a violation of the named kind.
pub(crate) fn is_violation(error: &DieselError, expected: &DatabaseErrorKind) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(kind, _)
            if std::mem::discriminant(kind) == std::mem::discriminant(expected)
    )
}
