//! PostgreSQL-backed `TeaRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::not;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{CatalogueWipe, TeaPersistenceError, TeaRepository};
use crate::domain::{Tea, TeaDraft, TeaId, UserId};

use super::diesel_error_mapping::{is_violation, map_diesel_error, map_pool_error};
use super::models::{NewTeaRow, TeaRow};
use super::pool::{DbPool, PoolError};
use super::schema::{tea_ratings, teas};

/// Diesel-backed implementation of the tea repository port.
#[derive(Clone)]
pub struct DieselTeaRepository {
    pool: DbPool,
}

impl DieselTeaRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> TeaPersistenceError {
    map_pool_error(error, TeaPersistenceError::connection)
}

fn map_diesel(error: DieselError) -> TeaPersistenceError {
    map_diesel_error(
        error,
        TeaPersistenceError::query,
        TeaPersistenceError::connection,
    )
}

fn to_count(value: impl TryInto<u64>) -> Result<u64, TeaPersistenceError> {
    value
        .try_into()
        .map_err(|_| TeaPersistenceError::query("row count out of range"))
}

fn into_teas(rows: Vec<TeaRow>) -> Vec<Tea> {
    rows.into_iter().map(Tea::from).collect()
}

#[async_trait]
impl TeaRepository for DieselTeaRepository {
    async fn insert(&self, draft: &TeaDraft) -> Result<Tea, TeaPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::insert_into(teas::table)
            .values(NewTeaRow::from(draft))
            .returning(TeaRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Tea::from)
            .map_err(|error| {
                if is_violation(&error, &DatabaseErrorKind::UniqueViolation) {
                    TeaPersistenceError::duplicate(draft.name(), draft.provider())
                } else {
                    map_diesel(error)
                }
            })
    }

    async fn find_by_id(&self, id: TeaId) -> Result<Option<Tea>, TeaPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        teas::table
            .find(id.as_i64())
            .select(TeaRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Tea::from))
            .map_err(map_diesel)
    }

    async fn find_by_name_and_provider(
        &self,
        name: &str,
        provider: &str,
    ) -> Result<Option<Tea>, TeaPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        teas::table
            .filter(teas::name.eq(name))
            .filter(teas::provider.eq(provider))
            .select(TeaRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Tea::from))
            .map_err(map_diesel)
    }

    async fn list_all(&self) -> Result<Vec<Tea>, TeaPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        teas::table
            .order(teas::id.asc())
            .select(TeaRow::as_select())
            .load(&mut conn)
            .await
            .map(into_teas)
            .map_err(map_diesel)
    }

    async fn list_unrated_by(&self, user_id: UserId) -> Result<Vec<Tea>, TeaPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rated = tea_ratings::table
            .filter(tea_ratings::user_id.eq(user_id.as_i64()))
            .select(tea_ratings::tea_id);
        teas::table
            .filter(not(teas::id.eq_any(rated)))
            .order(teas::id.asc())
            .select(TeaRow::as_select())
            .load(&mut conn)
            .await
            .map(into_teas)
            .map_err(map_diesel)
    }

    async fn count(&self) -> Result<u64, TeaPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let total: i64 = teas::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_count(total)
    }

    async fn delete_all_with_ratings(&self) -> Result<CatalogueWipe, TeaPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let (ratings_removed, teas_removed) = conn
            .transaction(|conn| {
                async move {
                    let ratings_removed = diesel::delete(tea_ratings::table).execute(conn).await?;
                    let teas_removed = diesel::delete(teas::table).execute(conn).await?;
                    Ok((ratings_removed, teas_removed))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        Ok(CatalogueWipe {
            teas_removed: to_count(teas_removed)?,
            ratings_removed: to_count(ratings_removed)?,
        })
    }

    async fn insert_missing(&self, drafts: &[TeaDraft]) -> Result<Vec<Tea>, TeaPersistenceError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<NewTeaRow<'_>> = drafts.iter().map(NewTeaRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let inserted: Vec<TeaRow> = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(teas::table)
                        .values(&rows)
                        .on_conflict((teas::name, teas::provider))
                        .do_nothing()
                        .returning(TeaRow::as_returning())
                        .get_results(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        let mut teas = into_teas(inserted);
        teas.sort_by_key(|tea| tea.id);
        Ok(teas)
    }
}
