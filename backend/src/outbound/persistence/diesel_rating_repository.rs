//! PostgreSQL-backed `RatingRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RatingPersistenceError, RatingRepository};
use crate::domain::{RatingDraft, RatingId, RatingWithTea, TeaRating, UserId};

use super::diesel_error_mapping::{is_violation, map_diesel_error, map_pool_error};
use super::models::{RatingRow, RatingValuesRow, TeaRow};
use super::pool::{DbPool, PoolError};
use super::schema::{tea_ratings, teas};

/// Diesel-backed implementation of the rating repository port.
#[derive(Clone)]
pub struct DieselRatingRepository {
    pool: DbPool,
}

impl DieselRatingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> RatingPersistenceError {
    map_pool_error(error, RatingPersistenceError::connection)
}

fn map_diesel(error: DieselError) -> RatingPersistenceError {
    if is_violation(&error, &DatabaseErrorKind::ForeignKeyViolation) {
        return RatingPersistenceError::missing_reference("referenced user or tea was removed");
    }
    map_diesel_error(
        error,
        RatingPersistenceError::query,
        RatingPersistenceError::connection,
    )
}

fn joined((rating, tea): (RatingRow, TeaRow)) -> RatingWithTea {
    RatingWithTea {
        rating: TeaRating::from(rating),
        tea_name: tea.name,
        provider: tea.provider,
    }
}

#[async_trait]
impl RatingRepository for DieselRatingRepository {
    async fn insert(&self, draft: &RatingDraft) -> Result<TeaRating, RatingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::insert_into(tea_ratings::table)
            .values(RatingValuesRow::from(draft))
            .returning(RatingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(TeaRating::from)
            .map_err(map_diesel)
    }

    async fn find_by_id(&self, id: RatingId) -> Result<Option<TeaRating>, RatingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        tea_ratings::table
            .find(id.as_i64())
            .select(RatingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(TeaRating::from))
            .map_err(map_diesel)
    }

    async fn update(
        &self,
        rating: &TeaRating,
    ) -> Result<Option<TeaRating>, RatingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::update(tea_ratings::table.find(rating.id.as_i64()))
            .set(RatingValuesRow::from(rating))
            .returning(RatingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map(|row| row.map(TeaRating::from))
            .map_err(map_diesel)
    }

    async fn delete(&self, id: RatingId) -> Result<bool, RatingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let removed = diesel::delete(tea_ratings::table.find(id.as_i64()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(removed > 0)
    }

    async fn list_all(&self) -> Result<Vec<TeaRating>, RatingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<RatingRow> = tea_ratings::table
            .order(tea_ratings::id.asc())
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(TeaRating::from).collect())
    }

    async fn list_with_teas(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<RatingWithTea>, RatingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let mut query = tea_ratings::table
            .inner_join(teas::table)
            .order(tea_ratings::id.asc())
            .select((RatingRow::as_select(), TeaRow::as_select()))
            .into_boxed();
        if let Some(user_id) = user_id {
            query = query.filter(tea_ratings::user_id.eq(user_id.as_i64()));
        }
        let rows: Vec<(RatingRow, TeaRow)> = query.load(&mut conn).await.map_err(map_diesel)?;
        Ok(rows.into_iter().map(joined).collect())
    }

    async fn count(&self) -> Result<u64, RatingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let total: i64 = tea_ratings::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        u64::try_from(total).map_err(|_| RatingPersistenceError::query("negative row count"))
    }
}
