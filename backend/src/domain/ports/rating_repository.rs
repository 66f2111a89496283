//! Port abstraction for rating persistence.
use async_trait::async_trait;

use crate::domain::{RatingDraft, RatingId, RatingWithTea, TeaRating, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by rating repository adapters.
    pub enum RatingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "rating repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rating repository query failed: {message}",
        /// The referenced user or tea vanished between validation and write.
        MissingReference { message: String } => "rating references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Store a new rating.
    async fn insert(&self, draft: &RatingDraft) -> Result<TeaRating, RatingPersistenceError>;

    async fn find_by_id(&self, id: RatingId) -> Result<Option<TeaRating>, RatingPersistenceError>;

    /// Overwrite every column of an existing rating. Returns `None` when the
    /// row no longer exists.
    async fn update(&self, rating: &TeaRating)
    -> Result<Option<TeaRating>, RatingPersistenceError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: RatingId) -> Result<bool, RatingPersistenceError>;

    /// Every rating, ordered by identifier.
    async fn list_all(&self) -> Result<Vec<TeaRating>, RatingPersistenceError>;

    /// Ratings joined with their tea, optionally restricted to one user,
    /// ordered by rating identifier.
    async fn list_with_teas(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<RatingWithTea>, RatingPersistenceError>;

    async fn count(&self) -> Result<u64, RatingPersistenceError>;
}
