//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Name lookups apply `normalize_name` to every stored row in Rust, so
//! legacy rows padded with any Unicode whitespace match exactly as the
//! reconciler groups them.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NormalizedName, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{tea_ratings, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use teahouse::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/teahouse")).await?;
    /// let repository = DieselUserRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel(error: DieselError) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn to_count(value: i64) -> Result<u64, UserPersistenceError> {
    u64::try_from(value).map_err(|_| UserPersistenceError::query("negative row count"))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, name: &NormalizedName) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(name))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(map_diesel)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        users::table
            .find(id.as_i64())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(User::from))
            .map_err(map_diesel)
    }

    async fn find_by_normalized_name(
        &self,
        name: &NormalizedName,
    ) -> Result<Option<User>, UserPersistenceError> {
        // SQL `btrim` and `lower` disagree with `str::trim` and
        // `str::to_lowercase` outside ASCII spaces, so matching stays in Rust.
        let users = self.list_all().await?;
        Ok(users
            .into_iter()
            .find(|user| user.normalized_name() == *name))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_count(total)
    }

    async fn merge_into(
        &self,
        survivor: UserId,
        duplicates: &[UserId],
    ) -> Result<u64, UserPersistenceError> {
        if duplicates.is_empty() {
            return Ok(0);
        }
        let survivor_id = survivor.as_i64();
        let duplicate_ids: Vec<i64> = duplicates.iter().map(|id| id.as_i64()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let moved = conn
            .transaction(|conn| {
                async move {
                    let moved = diesel::update(
                        tea_ratings::table.filter(tea_ratings::user_id.eq_any(&duplicate_ids)),
                    )
                    .set(tea_ratings::user_id.eq(survivor_id))
                    .execute(conn)
                    .await?;

                    diesel::delete(users::table.filter(users::id.eq_any(&duplicate_ids)))
                        .execute(conn)
                        .await?;

                    Ok(moved)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        u64::try_from(moved).map_err(|_| UserPersistenceError::query("row count overflow"))
    }
}
