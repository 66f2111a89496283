//! Driving port for the duplicate-user sweep.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::Error;

/// Outcome of one reconciliation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    /// Duplicate groups collapsed onto their survivor.
    pub groups_merged: u64,
    pub users_removed: u64,
    pub ratings_reassigned: u64,
    /// Groups left untouched because their transaction failed.
    pub failed_groups: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserReconciliation: Send + Sync {
    /// Collapse users sharing a normalised name onto the lowest identifier.
    ///
    /// Only a failure to load the user list aborts the sweep; per-group
    /// failures are counted in the report.
    async fn reconcile(&self) -> Result<ReconciliationReport, Error>;
}
