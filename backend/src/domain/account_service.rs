//! Account use-cases: registration, login, and token resolution.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::persistence_error_mapping::map_user_persistence_error;
use crate::domain::ports::{AccountCommand, AccountQuery, IssuedToken, UserRepository};
use crate::domain::{AccessToken, Error, NormalizedName, User, UserId, require_name};

/// Account service implementing the identity driving ports.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
}

impl<U> AccountService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn validated_name(raw: &str) -> Result<NormalizedName, Error> {
    require_name(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "name", "code": "empty_name" }))
    })
}

fn issue(user: User) -> IssuedToken {
    let token = AccessToken::for_user(user.id());
    IssuedToken { user, token }
}

impl<U> AccountService<U>
where
    U: UserRepository,
{
    async fn find_by_name(&self, name: &NormalizedName) -> Result<Option<User>, Error> {
        self.users
            .find_by_normalized_name(name)
            .await
            .map_err(map_user_persistence_error)
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, name: &str) -> Result<IssuedToken, Error> {
        let name = validated_name(name)?;
        if self.find_by_name(&name).await?.is_some() {
            return Err(Error::conflict(format!("user {name} already exists")));
        }
        let user = self
            .users
            .insert(&name)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(issue(user))
    }

    async fn login(&self, name: &str) -> Result<IssuedToken, Error> {
        let name = validated_name(name)?;
        let user = self
            .find_by_name(&name)
            .await?
            .ok_or_else(|| Error::not_found(format!("no user named {name}")))?;
        Ok(issue(user))
    }
}

#[async_trait]
impl<U> AccountQuery for AccountService<U>
where
    U: UserRepository,
{
    async fn find_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} does not exist")))
    }

    async fn resolve_token(&self, raw: &str) -> Result<User, Error> {
        let id = AccessToken::parse(raw).map_err(|err| Error::unauthorized(err.to_string()))?;
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::unauthorized("token does not belong to a known user"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
