//! Store maintenance run before the server accepts requests.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    ReconciliationReport, TeaRepository, UserReconciliation, UserRepository,
};
use crate::domain::{Error, TeaCatalogueService, UserReconciler};

use super::ServerSettings;

/// Startup maintenance failures. Both abort the process before serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("sample tea seeding failed: {0}")]
    Seeding(#[source] Error),
    #[error("user reconciliation failed: {0}")]
    Reconciliation(#[source] Error),
}

/// What startup maintenance did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOutcome {
    /// Sample teas inserted into an empty catalogue.
    pub seeded_teas: usize,
    /// Present when the duplicate-user sweep ran.
    pub reconciliation: Option<ReconciliationReport>,
}

/// Seed an empty catalogue and collapse duplicate users as configured.
///
/// # Examples
///
/// ```rust
/// use std::ffi::OsString;
/// use std::sync::Arc;
///
/// use ortho_config::OrthoConfig;
/// use teahouse::settings::{ServerSettings, prepare_store};
/// use teahouse::test_support::InMemoryStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ServerSettings::load_from_iter([OsString::from("teahouse")])?;
/// let store = Arc::new(InMemoryStore::new());
/// let outcome = prepare_store(&settings, store.clone(), store).await?;
/// assert!(outcome.reconciliation.is_some());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`StartupError`] when seeding fails or the user list cannot be
/// read. Individual duplicate groups that fail are counted in the report.
pub async fn prepare_store<U, T>(
    settings: &ServerSettings,
    users: Arc<U>,
    teas: Arc<T>,
) -> Result<StartupOutcome, StartupError>
where
    U: UserRepository + 'static,
    T: TeaRepository + 'static,
{
    let mut outcome = StartupOutcome::default();

    if settings.seed_on_empty() {
        let catalogue = TeaCatalogueService::new(teas, users.clone());
        let seeded = catalogue
            .seed_if_empty()
            .await
            .map_err(StartupError::Seeding)?;
        info!(seeded = seeded.len(), "sample tea seeding finished");
        outcome.seeded_teas = seeded.len();
    } else {
        info!(reason = "disabled", "sample tea seeding skipped");
    }

    if settings.reconcile_on_startup() {
        let report = UserReconciler::new(users)
            .reconcile()
            .await
            .map_err(StartupError::Reconciliation)?;
        info!(
            groups_merged = report.groups_merged,
            users_removed = report.users_removed,
            failed_groups = report.failed_groups,
            "startup user reconciliation finished"
        );
        outcome.reconciliation = Some(report);
    } else {
        info!(reason = "disabled", "startup user reconciliation skipped");
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    //! Startup maintenance against the in-memory store.

    use super::*;
    use crate::test_support::InMemoryStore;
    use rstest::{fixture, rstest};

    fn settings(seed_on_empty: bool, reconcile_on_startup: bool) -> ServerSettings {
        ServerSettings {
            host: None,
            port: None,
            database_url: None,
            max_connections: None,
            min_idle_connections: None,
            connection_timeout_secs: None,
            reconcile_on_startup: Some(reconcile_on_startup),
            seed_on_empty: Some(seed_on_empty),
            allowed_origin: None,
        }
    }

    fn unset_settings() -> ServerSettings {
        ServerSettings {
            reconcile_on_startup: None,
            seed_on_empty: None,
            ..settings(false, false)
        }
    }

    #[fixture]
    fn store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::new())
    }

    #[rstest]
    #[tokio::test]
    async fn seeds_only_an_empty_catalogue(store: Arc<InMemoryStore>) {
        let first = prepare_store(&settings(true, false), store.clone(), store.clone())
            .await
            .expect("first startup");
        let second = prepare_store(&settings(true, false), store.clone(), store.clone())
            .await
            .expect("second startup");

        assert_eq!(first.seeded_teas, 6);
        assert_eq!(second.seeded_teas, 0);
        assert_eq!(store.teas().len(), 6);
    }

    #[rstest]
    #[tokio::test]
    async fn reconciles_legacy_duplicates(store: Arc<InMemoryStore>) {
        store.insert_legacy_user("amy");
        store.insert_legacy_user("Amy ");

        let outcome = prepare_store(&settings(false, true), store.clone(), store.clone())
            .await
            .expect("startup");

        let report = outcome.reconciliation.expect("sweep ran");
        assert_eq!(report.users_removed, 1);
        assert_eq!(store.users().len(), 1);
        assert!(store.teas().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unset_switches_reconcile_without_seeding(store: Arc<InMemoryStore>) {
        store.insert_legacy_user("amy");
        store.insert_legacy_user("\tAMY");

        let outcome = prepare_store(&unset_settings(), store.clone(), store.clone())
            .await
            .expect("startup");

        assert_eq!(outcome.seeded_teas, 0);
        assert!(outcome.reconciliation.is_some());
        assert_eq!(store.users().len(), 1);
        assert!(store.teas().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_maintenance_leaves_the_store_alone(store: Arc<InMemoryStore>) {
        store.insert_legacy_user("amy");
        store.insert_legacy_user("AMY");

        let outcome = prepare_store(&settings(false, false), store.clone(), store.clone())
            .await
            .expect("startup");

        assert_eq!(outcome, StartupOutcome::default());
        assert_eq!(store.users().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn an_offline_store_aborts_startup(store: Arc<InMemoryStore>) {
        store.set_offline(true);

        let error = prepare_store(&settings(false, true), store.clone(), store)
            .await
            .expect_err("offline store");

        assert!(matches!(error, StartupError::Reconciliation(_)));
    }
}
