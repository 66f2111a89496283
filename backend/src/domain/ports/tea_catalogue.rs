//! Driving ports for the tea catalogue.

use async_trait::async_trait;

use crate::domain::{Error, Tea, TeaDraft, UserId};

use super::CatalogueWipe;

/// Catalogue mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeaCatalogueCommand: Send + Sync {
    /// Add a tea. Fails with a conflict when the name and provider exist.
    async fn register_tea(&self, draft: TeaDraft) -> Result<Tea, Error>;

    /// Remove every tea and rating atomically.
    async fn drop_all(&self) -> Result<CatalogueWipe, Error>;

    /// Insert the starter catalogue, skipping teas already present.
    async fn seed_samples(&self) -> Result<Vec<Tea>, Error>;
}

/// Catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeaCatalogueQuery: Send + Sync {
    async fn list_teas(&self) -> Result<Vec<Tea>, Error>;

    /// Teas `user_id` has not rated yet. Unknown users are not found.
    async fn candidate_teas(&self, user_id: UserId) -> Result<Vec<Tea>, Error>;
}
