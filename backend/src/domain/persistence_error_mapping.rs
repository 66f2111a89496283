//! Mapping from repository port errors onto domain errors.
//!
//! Connection failures become `service_unavailable`; everything else the
//! store reports is internal and redacted by the HTTP adapter.

use crate::domain::Error;
use crate::domain::ports::{RatingPersistenceError, TeaPersistenceError, UserPersistenceError};

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

pub(crate) fn map_tea_persistence_error(error: TeaPersistenceError) -> Error {
    match error {
        TeaPersistenceError::Connection { message } => Error::service_unavailable(message),
        TeaPersistenceError::Query { message } => Error::internal(message),
        TeaPersistenceError::Duplicate { name, provider } => {
            Error::conflict(format!("tea {name} from {provider} already exists"))
        }
    }
}

pub(crate) fn map_rating_persistence_error(error: RatingPersistenceError) -> Error {
    match error {
        RatingPersistenceError::Connection { message } => Error::service_unavailable(message),
        RatingPersistenceError::Query { message } => Error::internal(message),
        RatingPersistenceError::MissingReference { message } => Error::not_found(message),
    }
}
