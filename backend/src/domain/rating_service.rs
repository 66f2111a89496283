//! Rating submission, editing, and retrieval.
//!
//! Every write resolves its user and tea references before touching the
//! ratings table, so a dangling reference is reported as not found and no row
//! is written.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::persistence_error_mapping::{
    map_rating_persistence_error, map_tea_persistence_error, map_user_persistence_error,
};
use crate::domain::ports::{
    RatingRepository, RatingsCommand, RatingsQuery, TeaRepository, UserRepository,
};
use crate::domain::{
    Error, RatingDraft, RatingId, RatingPatch, RatingWithTea, TeaId, TeaRating, UserId,
};

/// Rating service implementing the rating driving ports.
#[derive(Clone)]
pub struct RatingService<R, T, U> {
    ratings: Arc<R>,
    teas: Arc<T>,
    users: Arc<U>,
}

impl<R, T, U> RatingService<R, T, U> {
    pub fn new(ratings: Arc<R>, teas: Arc<T>, users: Arc<U>) -> Self {
        Self {
            ratings,
            teas,
            users,
        }
    }
}

impl<R, T, U> RatingService<R, T, U>
where
    R: RatingRepository,
    T: TeaRepository,
    U: UserRepository,
{
    async fn ensure_user(&self, id: UserId) -> Result<(), Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("user {id} does not exist")))
    }

    async fn ensure_tea(&self, id: TeaId) -> Result<(), Error> {
        self.teas
            .find_by_id(id)
            .await
            .map_err(map_tea_persistence_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("tea {id} does not exist")))
    }
}

fn missing_rating(id: RatingId) -> Error {
    Error::not_found(format!("rating {id} does not exist"))
}

#[async_trait]
impl<R, T, U> RatingsCommand for RatingService<R, T, U>
where
    R: RatingRepository,
    T: TeaRepository,
    U: UserRepository,
{
    async fn submit(&self, draft: RatingDraft) -> Result<TeaRating, Error> {
        self.ensure_user(draft.user_id).await?;
        self.ensure_tea(draft.tea_id).await?;
        let rating = self
            .ratings
            .insert(&draft)
            .await
            .map_err(map_rating_persistence_error)?;
        info!(rating_id = %rating.id, tea_id = %rating.tea_id, "rating submitted");
        Ok(rating)
    }

    async fn edit(&self, id: RatingId, patch: RatingPatch) -> Result<TeaRating, Error> {
        let current = self
            .ratings
            .find_by_id(id)
            .await
            .map_err(map_rating_persistence_error)?
            .ok_or_else(|| missing_rating(id))?;
        if let Some(user_id) = patch.user_id {
            self.ensure_user(user_id).await?;
        }
        if let Some(tea_id) = patch.tea_id {
            self.ensure_tea(tea_id).await?;
        }
        if patch.is_empty() {
            return Ok(current);
        }
        self.ratings
            .update(&current.with_patch(&patch))
            .await
            .map_err(map_rating_persistence_error)?
            .ok_or_else(|| missing_rating(id))
    }

    async fn delete(&self, id: RatingId) -> Result<(), Error> {
        let removed = self
            .ratings
            .delete(id)
            .await
            .map_err(map_rating_persistence_error)?;
        if removed {
            Ok(())
        } else {
            Err(missing_rating(id))
        }
    }
}

#[async_trait]
impl<R, T, U> RatingsQuery for RatingService<R, T, U>
where
    R: RatingRepository,
    T: TeaRepository,
    U: UserRepository,
{
    async fn list_ratings(&self) -> Result<Vec<TeaRating>, Error> {
        self.ratings
            .list_all()
            .await
            .map_err(map_rating_persistence_error)
    }

    async fn ratings_for_user(&self, user_id: UserId) -> Result<Vec<RatingWithTea>, Error> {
        self.ensure_user(user_id).await?;
        self.ratings
            .list_with_teas(Some(user_id))
            .await
            .map_err(map_rating_persistence_error)
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;
