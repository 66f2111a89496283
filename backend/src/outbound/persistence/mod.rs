//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types; business rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures are mapped onto each port's
//!   error enum.
//!
//! # Example
//!
//! ```rust,no_run
//! use teahouse::outbound::persistence::{DbPool, DieselTeaRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/teahouse")).await?;
//! let teas = DieselTeaRepository::new(pool);
//! # let _ = teas;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_rating_repository;
mod diesel_tea_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_rating_repository::DieselRatingRepository;
pub use diesel_tea_repository::DieselTeaRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{
    DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DEFAULT_TIMEOUT_SECS, DbPool, PoolConfig, PoolError,
};
