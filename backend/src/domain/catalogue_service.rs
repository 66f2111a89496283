//! Tea catalogue use-cases, including the candidate-tea filter.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::persistence_error_mapping::{
    map_tea_persistence_error, map_user_persistence_error,
};
use crate::domain::ports::{
    CatalogueWipe, TeaCatalogueCommand, TeaCatalogueQuery, TeaRepository, UserRepository,
};
use crate::domain::{Error, Tea, TeaDraft, UserId, sample_teas};

/// Catalogue service implementing the tea driving ports.
#[derive(Clone)]
pub struct TeaCatalogueService<T, U> {
    teas: Arc<T>,
    users: Arc<U>,
}

impl<T, U> TeaCatalogueService<T, U> {
    pub fn new(teas: Arc<T>, users: Arc<U>) -> Self {
        Self { teas, users }
    }
}

impl<T, U> TeaCatalogueService<T, U>
where
    T: TeaRepository,
    U: UserRepository,
{
    /// Seed the starter catalogue when no teas are stored.
    ///
    /// Returns the teas inserted, which is empty when the catalogue already
    /// had entries.
    pub async fn seed_if_empty(&self) -> Result<Vec<Tea>, Error> {
        let count = self.teas.count().await.map_err(map_tea_persistence_error)?;
        if count > 0 {
            return Ok(Vec::new());
        }
        self.seed_samples().await
    }
}

#[async_trait]
impl<T, U> TeaCatalogueCommand for TeaCatalogueService<T, U>
where
    T: TeaRepository,
    U: UserRepository,
{
    async fn register_tea(&self, draft: TeaDraft) -> Result<Tea, Error> {
        let existing = self
            .teas
            .find_by_name_and_provider(draft.name(), draft.provider())
            .await
            .map_err(map_tea_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict(format!(
                "tea {} from {} already exists",
                draft.name(),
                draft.provider()
            )));
        }
        let tea = self
            .teas
            .insert(&draft)
            .await
            .map_err(map_tea_persistence_error)?;
        info!(tea_id = %tea.id, "tea registered");
        Ok(tea)
    }

    async fn drop_all(&self) -> Result<CatalogueWipe, Error> {
        let wipe = self
            .teas
            .delete_all_with_ratings()
            .await
            .map_err(map_tea_persistence_error)?;
        info!(
            teas_removed = wipe.teas_removed,
            ratings_removed = wipe.ratings_removed,
            "catalogue dropped"
        );
        Ok(wipe)
    }

    async fn seed_samples(&self) -> Result<Vec<Tea>, Error> {
        let inserted = self
            .teas
            .insert_missing(&sample_teas())
            .await
            .map_err(map_tea_persistence_error)?;
        info!(inserted = inserted.len(), "sample teas seeded");
        Ok(inserted)
    }
}

#[async_trait]
impl<T, U> TeaCatalogueQuery for TeaCatalogueService<T, U>
where
    T: TeaRepository,
    U: UserRepository,
{
    async fn list_teas(&self) -> Result<Vec<Tea>, Error> {
        self.teas.list_all().await.map_err(map_tea_persistence_error)
    }

    async fn candidate_teas(&self, user_id: UserId) -> Result<Vec<Tea>, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?;
        if user.is_none() {
            return Err(Error::not_found(format!("user {user_id} does not exist")));
        }
        self.teas
            .list_unrated_by(user_id)
            .await
            .map_err(map_tea_persistence_error)
    }
}
