//! Collapse users whose names normalise to the same identity.
//!
//! Each duplicate group is merged onto its lowest identifier in its own
//! transaction; rerunning the command after a clean sweep changes nothing.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use teahouse::domain::UserReconciler;
use teahouse::domain::ports::UserReconciliation;
use teahouse::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, run_migrations};
use teahouse::settings::{DATABASE_URL_ENV, resolve_database_url};
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

/// `reconcile-users` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reconcile-users",
    about = "Merge users sharing a normalised name onto the lowest identifier",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Skip applying pending migrations first.
    #[arg(long = "skip-migrations")]
    skip_migrations: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(
        args.database_url.as_deref(),
        std::env::var(DATABASE_URL_ENV).ok(),
    )?;
    if !args.skip_migrations {
        run_migrations(&database_url)
            .await
            .wrap_err("run migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1).with_min_idle(None))
        .await
        .wrap_err("create database pool")?;

    let report = UserReconciler::new(Arc::new(DieselUserRepository::new(pool)))
        .reconcile()
        .await
        .wrap_err("reconcile users")?;

    println!("groups_merged={}", report.groups_merged);
    println!("users_removed={}", report.users_removed);
    println!("ratings_reassigned={}", report.ratings_reassigned);
    println!("failed_groups={}", report.failed_groups);
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument parsing.

    use clap::Parser;
    use rstest::rstest;

    use super::CliArgs;

    #[rstest]
    fn database_url_flag_is_optional() {
        let args = CliArgs::try_parse_from(["reconcile-users"]).expect("no flags");
        assert!(args.database_url.is_none());
        assert!(!args.skip_migrations);
    }

    #[rstest]
    fn flags_are_parsed() {
        let args = CliArgs::try_parse_from([
            "reconcile-users",
            "--database-url",
            "postgres://tea@db/tea",
            "--skip-migrations",
        ])
        .expect("flags parse");
        assert_eq!(args.database_url.as_deref(), Some("postgres://tea@db/tea"));
        assert!(args.skip_migrations);
    }
}
