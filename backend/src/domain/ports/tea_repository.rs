//! Port abstraction for tea catalogue persistence.
use async_trait::async_trait;

use crate::domain::{Tea, TeaDraft, TeaId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tea repository adapters.
    pub enum TeaPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "tea repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tea repository query failed: {message}",
        /// A tea with the same name and provider is already stored.
        Duplicate { name: String, provider: String } => "tea {name} from {provider} already exists",
    }
}

/// Row counts removed by [`TeaRepository::delete_all_with_ratings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogueWipe {
    pub teas_removed: u64,
    pub ratings_removed: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeaRepository: Send + Sync {
    /// Store a new tea.
    async fn insert(&self, draft: &TeaDraft) -> Result<Tea, TeaPersistenceError>;

    /// Fetch a tea by identifier.
    async fn find_by_id(&self, id: TeaId) -> Result<Option<Tea>, TeaPersistenceError>;

    /// Fetch the tea with exactly this name and provider.
    async fn find_by_name_and_provider(
        &self,
        name: &str,
        provider: &str,
    ) -> Result<Option<Tea>, TeaPersistenceError>;

    /// Every tea, ordered by identifier.
    async fn list_all(&self) -> Result<Vec<Tea>, TeaPersistenceError>;

    /// Teas the user has never rated, ordered by identifier.
    async fn list_unrated_by(&self, user_id: UserId) -> Result<Vec<Tea>, TeaPersistenceError>;

    async fn count(&self) -> Result<u64, TeaPersistenceError>;

    /// Remove every rating and then every tea in one transaction.
    ///
    /// Either both tables are emptied or neither changes.
    async fn delete_all_with_ratings(&self) -> Result<CatalogueWipe, TeaPersistenceError>;

    /// Store each draft whose `(name, provider)` is not present yet, in one
    /// transaction. Returns only the rows inserted.
    async fn insert_missing(&self, drafts: &[TeaDraft]) -> Result<Vec<Tea>, TeaPersistenceError>;
}
