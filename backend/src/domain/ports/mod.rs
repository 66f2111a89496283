//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by the Diesel adapters and the
//! in-memory store; driving ports are implemented by the domain services and
//! called by the HTTP adapter and maintenance binaries.

mod macros;
pub(crate) use macros::define_port_error;

mod account;
mod rating_repository;
mod rating_summary;
mod ratings;
mod tea_catalogue;
mod tea_repository;
mod user_reconciliation;
mod user_repository;

pub use account::{AccountCommand, AccountQuery, IssuedToken};
#[cfg(test)]
pub use account::{MockAccountCommand, MockAccountQuery};
#[cfg(test)]
pub use rating_repository::MockRatingRepository;
pub use rating_repository::{RatingPersistenceError, RatingRepository};
#[cfg(test)]
pub use rating_summary::MockRatingSummaryQuery;
pub use rating_summary::{Dashboard, RatingSummaryQuery};
#[cfg(test)]
pub use ratings::{MockRatingsCommand, MockRatingsQuery};
pub use ratings::{RatingsCommand, RatingsQuery};
#[cfg(test)]
pub use tea_catalogue::{MockTeaCatalogueCommand, MockTeaCatalogueQuery};
pub use tea_catalogue::{TeaCatalogueCommand, TeaCatalogueQuery};
#[cfg(test)]
pub use tea_repository::MockTeaRepository;
pub use tea_repository::{CatalogueWipe, TeaPersistenceError, TeaRepository};
#[cfg(test)]
pub use user_reconciliation::MockUserReconciliation;
pub use user_reconciliation::{ReconciliationReport, UserReconciliation};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
