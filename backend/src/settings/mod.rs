//! Server configuration and startup maintenance.

mod config;
mod startup;

pub use config::{DATABASE_URL_ENV, DatabaseUrlError, ServerSettings, resolve_database_url};
pub use startup::{StartupError, StartupOutcome, prepare_store};
