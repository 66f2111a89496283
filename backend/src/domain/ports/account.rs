//! Driving ports for registration, login, and token resolution.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, User, UserId};

/// A user together with the token that identifies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub user: User,
    pub token: AccessToken,
}

/// Use-cases that create or sign in users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a user. Fails with a conflict when the normalised name is taken.
    async fn register(&self, name: &str) -> Result<IssuedToken, Error>;

    /// Sign in by name. Fails with not-found when nobody has that name.
    async fn login(&self, name: &str) -> Result<IssuedToken, Error>;
}

/// Read-side identity lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Fetch a user, failing with not-found when absent.
    async fn find_user(&self, id: UserId) -> Result<User, Error>;

    /// Decode a presented token and resolve it to a live user.
    ///
    /// Malformed tokens and tokens naming unknown users are both
    /// unauthorised.
    async fn resolve_token(&self, raw: &str) -> Result<User, Error>;
}
