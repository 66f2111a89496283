//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NormalizedName, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under the given name.
    async fn insert(&self, name: &NormalizedName) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the lowest-id user whose stored name normalises to `name`.
    async fn find_by_normalized_name(
        &self,
        name: &NormalizedName,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Every user, ordered by identifier.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    async fn count(&self) -> Result<u64, UserPersistenceError>;

    /// Re-point every rating owned by `duplicates` at `survivor`, then delete
    /// the duplicate users, in one transaction. Returns the number of ratings
    /// moved.
    async fn merge_into(
        &self,
        survivor: UserId,
        duplicates: &[UserId],
    ) -> Result<u64, UserPersistenceError>;
}
