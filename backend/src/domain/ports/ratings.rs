//! Driving ports for rating submission and retrieval.

use async_trait::async_trait;

use crate::domain::{Error, RatingDraft, RatingId, RatingPatch, RatingWithTea, TeaRating, UserId};

/// Rating mutations. Every write checks its user and tea references first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingsCommand: Send + Sync {
    async fn submit(&self, draft: RatingDraft) -> Result<TeaRating, Error>;

    /// Replace the fields present in `patch`.
    async fn edit(&self, id: RatingId, patch: RatingPatch) -> Result<TeaRating, Error>;

    async fn delete(&self, id: RatingId) -> Result<(), Error>;
}

/// Rating reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingsQuery: Send + Sync {
    async fn list_ratings(&self) -> Result<Vec<TeaRating>, Error>;

    /// A user's ratings with tea names. Unknown users are not found.
    async fn ratings_for_user(&self, user_id: UserId) -> Result<Vec<RatingWithTea>, Error>;
}
